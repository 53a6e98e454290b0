//! Router assembly (spec.md §6 REST surface), grounded on the teacher's
//! `websocket/routes.rs::create_router`: CORS scoped to the configured
//! client origin, paired with `TraceLayer` for request logging.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router as AxumRouter;
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::protocol::messages::CreateGameReplyData;
use crate::server::GameServer;

use super::handler::upgrade;

pub fn create_router(server: Arc<GameServer>) -> AxumRouter {
    let cors = match server.client_url().parse() {
        Ok(origin) => CorsLayer::new().allow_origin(AllowOrigin::exact(origin)),
        Err(_) => CorsLayer::new(),
    };

    AxumRouter::new()
        .route("/ws", get(upgrade))
        .route("/health", get(health))
        .route("/api/games/create", post(create_game))
        .route("/api/games/{pin}", get(get_game))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

async fn health(State(server): State<Arc<GameServer>>) -> impl IntoResponse {
    Json(server.health())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGameRequest {
    host_name: String,
}

async fn create_game(
    State(server): State<Arc<GameServer>>,
    Json(request): Json<CreateGameRequest>,
) -> impl IntoResponse {
    if request.host_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "hostName must not be empty" })),
        )
            .into_response();
    }
    match server.registry.create(request.host_name) {
        Ok((session, host_id)) => Json(CreateGameReplyData {
            success: true,
            game_id: session.id,
            pin: session.pin.as_str().to_string(),
            host_id,
        })
        .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

async fn get_game(State(server): State<Arc<GameServer>>, Path(pin): Path<String>) -> impl IntoResponse {
    match server.introspect(&pin).await {
        Some(view) => Json(view).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "game not found" })),
        )
            .into_response(),
    }
}
