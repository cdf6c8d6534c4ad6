//! Query handlers for the session context.
//!
//! Read-only views over the session table, used by the `/state` command and
//! the inspection endpoint.

use std::collections::{BTreeMap, BTreeSet};

use ashen_veil_core::error::DomainError;
use ashen_veil_core::ids::{ChatId, MessageId, UserId};
use ashen_veil_narrative::domain::acts::Act;
use ashen_veil_narrative::domain::flags::FlagValue;
use ashen_veil_narrative::domain::scenes::Scene;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::SessionTable;

/// Read-only view of a story session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// The chat owning the session.
    pub chat_id: ChatId,
    /// The user who started it.
    pub owner_id: UserId,
    /// Current act.
    pub act: Act,
    /// Scene whose prompt is awaited.
    pub scene: Scene,
    /// Collected items.
    pub inventory: BTreeSet<String>,
    /// Collected evidence in order.
    pub evidence: Vec<String>,
    /// Recorded flags.
    pub flags: BTreeMap<String, FlagValue>,
    /// Pinned message, if any.
    pub pinned_msg_id: Option<MessageId>,
    /// When the playthrough began.
    pub started_at: Option<DateTime<Utc>>,
}

/// Retrieves the session for a chat.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if the chat has no session.
pub fn get_session_by_chat(
    chat_id: ChatId,
    table: &SessionTable,
) -> Result<SessionView, DomainError> {
    let session = table
        .get(chat_id)
        .ok_or(DomainError::SessionNotFound(chat_id))?;
    Ok(SessionView {
        chat_id: session.chat_id(),
        owner_id: session.owner_id(),
        act: session.act(),
        scene: session.scene(),
        inventory: session.inventory().clone(),
        evidence: session.evidence().to_vec(),
        flags: session.flags().clone(),
        pinned_msg_id: session.pinned_msg_id(),
        started_at: session.started_at(),
    })
}
