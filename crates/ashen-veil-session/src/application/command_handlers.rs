//! Command handlers for the session context.
//!
//! Each handler resolves one command against the session table and returns
//! what the caller must render. None of them touch the transport.

use ashen_veil_core::clock::Clock;
use ashen_veil_core::command::Command;
use ashen_veil_core::error::DomainError;
use ashen_veil_narrative::domain::aggregates::Session;
use ashen_veil_narrative::domain::render::RenderPlan;
use tracing::{info, warn};

use crate::domain::commands::{DispatchAction, LoadSnapshot, ResetStory, SaveSnapshot, StartStory};
use crate::snapshot::SnapshotStore;
use crate::store::SessionTable;

/// Handles the `StartStory` command: replaces any session for the chat with a
/// fresh one and returns the opening plan.
#[must_use]
pub fn handle_start_story(
    command: &StartStory,
    clock: &dyn Clock,
    table: &SessionTable,
) -> RenderPlan {
    let (session, plan) = Session::begin(command.chat_id, command.owner_id, clock);
    let replaced = table.insert(session).is_some();
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        chat_id = %command.chat_id,
        replaced,
        "Story started"
    );
    plan
}

/// Handles the `ResetStory` command. Returns whether a session existed.
pub fn handle_reset_story(command: &ResetStory, table: &SessionTable) -> bool {
    let removed = table.remove(command.chat_id).is_some();
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        chat_id = %command.chat_id,
        removed,
        "Story reset"
    );
    removed
}

/// Handles the `DispatchAction` command: applies the pressed button to the
/// chat's session and returns the plan to render.
///
/// Any chat member may press a button; a sender other than the owner is only
/// logged.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if the chat has no session.
pub fn handle_dispatch_action(
    command: &DispatchAction,
    table: &SessionTable,
) -> Result<RenderPlan, DomainError> {
    table
        .update(command.chat_id, |session| {
            if session.owner_id() != command.sender_id {
                info!(
                    correlation_id = %command.correlation_id(),
                    chat_id = %command.chat_id,
                    owner_id = %session.owner_id(),
                    sender_id = %command.sender_id,
                    "Button pressed by someone other than the session owner"
                );
            }
            session.dispatch(&command.token)
        })
        .ok_or(DomainError::SessionNotFound(command.chat_id))
}

/// Handles the `SaveSnapshot` command: writes the whole table. Returns the
/// number of sessions written.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the snapshot cannot be written.
pub async fn handle_save_snapshot(
    command: &SaveSnapshot,
    table: &SessionTable,
    snapshots: &dyn SnapshotStore,
) -> Result<usize, DomainError> {
    let _persisting = table.lock_persistence().await;
    let sessions = table.snapshot();
    snapshots.save(&sessions).await.map_err(|e| {
        warn!(correlation_id = %command.correlation_id(), error = %e, "Snapshot save failed");
        DomainError::Infrastructure(e.to_string())
    })?;
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        sessions = sessions.len(),
        "Snapshot saved"
    );
    Ok(sessions.len())
}

/// Handles the `LoadSnapshot` command: replaces the whole table with the
/// stored one. Returns the number of sessions loaded.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the snapshot cannot be read; the
/// in-memory table is left untouched in that case.
pub async fn handle_load_snapshot(
    command: &LoadSnapshot,
    table: &SessionTable,
    snapshots: &dyn SnapshotStore,
) -> Result<usize, DomainError> {
    let _persisting = table.lock_persistence().await;
    let sessions = snapshots.load().await.map_err(|e| {
        warn!(correlation_id = %command.correlation_id(), error = %e, "Snapshot load failed");
        DomainError::Infrastructure(e.to_string())
    })?;
    let count = sessions.len();
    table.replace_all(sessions);
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        sessions = count,
        "Snapshot loaded"
    );
    Ok(count)
}
