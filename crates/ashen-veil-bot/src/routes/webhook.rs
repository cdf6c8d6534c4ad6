//! Telegram webhook endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use ashen_veil_telegram::types::Update;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::handlers::spawn_supervised;
use crate::state::AppState;

/// Acknowledgement returned to Telegram.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub ok: bool,
}

/// POST /telegram/webhook
///
/// Answers immediately; the update is handled on a supervised task.
#[instrument(skip(state, update), fields(update_id = update.update_id))]
async fn receive_update(
    State(state): State<AppState>,
    Json(update): Json<Update>,
) -> Json<WebhookAck> {
    match update.into_inbound() {
        Some(inbound) => {
            spawn_supervised(state, inbound);
        }
        None => debug!("Ignoring update without a command or button"),
    }
    Json(WebhookAck { ok: true })
}

/// Returns the webhook router.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(receive_update))
}
