use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::Response;

use crate::server::GameServer;

use super::connection::handle_socket;

pub async fn upgrade(
    ws: WebSocketUpgrade,
    State(server): State<Arc<GameServer>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, server))
}
