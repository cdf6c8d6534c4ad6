//! Chat transport port.
//!
//! The narrative core never talks to a chat platform directly. Everything it
//! shows the player goes through this trait, which adapter crates implement
//! for a concrete platform.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{ChatId, MessageId};

/// Formatting applied to outbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    /// Text is sent verbatim.
    #[default]
    Plain,
    /// Text uses the platform's lightweight markdown.
    Markdown,
}

/// One inline button offered to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Label shown on the button.
    pub label: String,
    /// Action token delivered back when the button is pressed.
    pub token: String,
}

impl Choice {
    /// Creates a new choice.
    #[must_use]
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Failure reported by a transport call.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The platform refused the request (unchanged content, message too old, bad markup).
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The platform could not be reached or answered with garbage.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Outbound delivery and edit-in-place primitives required by the engine.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a new text message.
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        style: TextStyle,
    ) -> Result<MessageId, TransportError>;

    /// Overwrites the text of a message previously sent to the chat.
    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        style: TextStyle,
    ) -> Result<(), TransportError>;

    /// Sends an image by URL with an optional caption.
    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<MessageId, TransportError>;

    /// Sends an audio clip by URL with an optional caption.
    async fn send_audio(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<MessageId, TransportError>;

    /// Sends a video by URL with an optional caption.
    async fn send_video(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<MessageId, TransportError>;

    /// Sends a text prompt with one inline button per choice.
    async fn send_prompt(
        &self,
        chat_id: ChatId,
        text: &str,
        choices: &[Choice],
    ) -> Result<MessageId, TransportError>;

    /// Shows the "typing…" indicator.
    async fn send_typing(&self, chat_id: ChatId) -> Result<(), TransportError>;

    /// Acknowledges a button press so the client stops its spinner.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;
}
