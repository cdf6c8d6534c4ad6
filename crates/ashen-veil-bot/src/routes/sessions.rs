//! Session inspection endpoint.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use ashen_veil_core::error::DomainError;
use ashen_veil_core::ids::ChatId;
use ashen_veil_session::application::query_handlers::{self, SessionView};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{chat_id}
#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let chat_id: ChatId = chat_id
        .parse()
        .map_err(|_| DomainError::Validation(format!("invalid chat id: {chat_id}")))?;

    let view = query_handlers::get_session_by_chat(chat_id, &state.sessions)?;

    Ok(Json(view))
}

/// Returns the sessions router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{chat_id}", get(get_session))
}
