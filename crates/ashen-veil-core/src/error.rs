//! Domain error types.

use thiserror::Error;

use crate::ids::ChatId;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No story session exists for the chat.
    #[error("session not found for chat {0}")]
    SessionNotFound(ChatId),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
