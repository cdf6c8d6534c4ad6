//! The Ashen Veil — Telegram bot server.
//!
//! Receives webhook updates, drives each chat's story session and exposes a
//! read-only inspection API.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full router. Shared by `main.rs` and the integration tests.
#[must_use]
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/telegram", routes::webhook::router())
        .nest("/sessions", routes::sessions::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
