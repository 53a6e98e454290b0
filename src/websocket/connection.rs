//! Per-connection glue: splits the socket into a send task (drains the
//! router's outbound channel) and a receive loop (parses frames and hands
//! them to the dispatcher), mirroring the teacher's
//! `websocket/connection.rs` split-socket pattern.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::protocol::messages::InboundFrame;
use crate::server::{dispatcher, GameServer};

pub async fn handle_socket(socket: WebSocket, server: Arc<GameServer>) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let mut outbound = server.register_connection(connection_id);

    let send_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            let text = match serde_json::to_string(&frame) {
                Ok(text) => text,
                Err(error) => {
                    warn!(%error, "failed to encode outbound frame");
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    info!(%connection_id, "connection established");
    while let Some(message) = receiver.next().await {
        let message = match message {
            Ok(message) => message,
            Err(error) => {
                debug!(%connection_id, %error, "socket read error, closing");
                break;
            }
        };
        match message {
            Message::Text(text) => match serde_json::from_str::<InboundFrame>(&text) {
                Ok(frame) => dispatcher::dispatch(&server, connection_id, frame).await,
                Err(error) => debug!(%connection_id, %error, "dropping unparseable frame"),
            },
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) | Message::Binary(_) => {}
        }
    }

    send_task.abort();
    server.handle_disconnect(connection_id).await;
    info!(%connection_id, "connection closed");
}
