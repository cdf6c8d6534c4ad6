//! Bot API payloads.
//!
//! Only the fields the bot reads are modelled; everything else in an update
//! is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// An incoming update delivered to the webhook.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    /// Update identifier.
    pub update_id: i64,
    /// A new message.
    #[serde(default)]
    pub message: Option<Message>,
    /// A pressed inline button.
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    /// Message identifier within the chat.
    pub message_id: i64,
    /// The chat the message belongs to.
    pub chat: Chat,
    /// Sender, absent for channel posts.
    #[serde(default)]
    pub from: Option<User>,
    /// Text content.
    #[serde(default)]
    pub text: Option<String>,
}

/// A chat.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    /// Chat identifier.
    pub id: i64,
}

/// A user.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    /// User identifier.
    pub id: i64,
}

/// A pressed inline button.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    /// Identifier to acknowledge.
    pub id: String,
    /// The user who pressed the button.
    pub from: User,
    /// The message carrying the button.
    #[serde(default)]
    pub message: Option<Message>,
    /// Payload attached to the button.
    #[serde(default)]
    pub data: Option<String>,
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Result on success.
    pub result: Option<T>,
    /// Error text on failure.
    #[serde(default)]
    pub description: Option<String>,
    /// Error code on failure.
    #[serde(default)]
    pub error_code: Option<u16>,
}

/// The part of a sent message the transport needs back.
#[derive(Debug, Deserialize)]
pub struct SentMessage {
    /// Identifier of the new message.
    pub message_id: i64,
}
