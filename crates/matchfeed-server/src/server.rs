//! Router assembly for the matchfeed HTTP + WebSocket server.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::websocket;

/// Build the axum router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/games", post(handlers::register_game))
        .route("/games/{game_id}/replay", post(handlers::start_replay))
        .route(
            "/games/{game_id}/windows/{start_sec}/{end_sec}/facets/{facet}",
            get(handlers::facet),
        )
        .route("/ingest", post(handlers::ingest))
        .route("/flush", post(handlers::flush))
        .route("/ws/{game_id}", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
