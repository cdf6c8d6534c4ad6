//! Command abstractions.

use uuid::Uuid;

use crate::ids::ChatId;

/// Trait that all inbound commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The chat whose session this command targets.
    fn chat_id(&self) -> ChatId;
}
