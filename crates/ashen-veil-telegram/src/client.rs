//! Bot API transport.

use ashen_veil_core::ids::{ChatId, MessageId};
use ashen_veil_core::transport::{Choice, TextStyle, Transport, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::types::{ApiResponse, SentMessage};

/// Default Bot API host.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// [`Transport`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    client: Client,
    endpoint: String,
}

impl std::fmt::Debug for TelegramTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramTransport").finish_non_exhaustive()
    }
}

fn parse_mode(style: TextStyle) -> Option<&'static str> {
    match style {
        TextStyle::Plain => None,
        TextStyle::Markdown => Some("Markdown"),
    }
}

fn keyboard(choices: &[Choice]) -> Value {
    let rows: Vec<Value> = choices
        .iter()
        .map(|choice| json!([{ "text": choice.label, "callback_data": choice.token }]))
        .collect();
    json!({ "inline_keyboard": rows })
}

impl TelegramTransport {
    /// Creates a transport for the bot identified by `token`.
    #[must_use]
    pub fn new(client: Client, api_url: &str, token: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: Value) -> Result<T, TransportError> {
        let response = self
            .client
            .post(format!("{}/{method}", self.endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Unavailable(format!("{method}: {e}")))?;
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TransportError::Unavailable(format!("{method}: {e}")))?;

        if envelope.ok {
            return envelope
                .result
                .ok_or_else(|| TransportError::Unavailable(format!("{method}: empty result")));
        }
        let description = envelope
            .description
            .unwrap_or_else(|| "no description".to_owned());
        debug!(method, error_code = ?envelope.error_code, description, "Bot API call refused");
        match envelope.error_code {
            Some(code) if code >= 500 || code == 429 => {
                Err(TransportError::Unavailable(format!("{method}: {description}")))
            }
            _ => Err(TransportError::Rejected(format!("{method}: {description}"))),
        }
    }

    async fn send(&self, method: &str, body: Value) -> Result<MessageId, TransportError> {
        let sent: SentMessage = self.call(method, body).await?;
        Ok(MessageId(sent.message_id))
    }

    async fn send_media(
        &self,
        method: &str,
        field: &str,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<MessageId, TransportError> {
        let mut body = json!({ "chat_id": chat_id.0 });
        body[field] = json!(url);
        if let Some(caption) = caption {
            body["caption"] = json!(caption);
            body["parse_mode"] = json!("Markdown");
        }
        self.send(method, body).await
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        style: TextStyle,
    ) -> Result<MessageId, TransportError> {
        let mut body = json!({ "chat_id": chat_id.0, "text": text });
        if let Some(mode) = parse_mode(style) {
            body["parse_mode"] = json!(mode);
        }
        self.send("sendMessage", body).await
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        style: TextStyle,
    ) -> Result<(), TransportError> {
        let mut body = json!({ "chat_id": chat_id.0, "message_id": message_id.0, "text": text });
        if let Some(mode) = parse_mode(style) {
            body["parse_mode"] = json!(mode);
        }
        self.call::<Value>("editMessageText", body).await.map(|_| ())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<MessageId, TransportError> {
        self.send_media("sendPhoto", "photo", chat_id, url, caption).await
    }

    async fn send_audio(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<MessageId, TransportError> {
        self.send_media("sendAudio", "audio", chat_id, url, caption).await
    }

    async fn send_video(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<MessageId, TransportError> {
        self.send_media("sendVideo", "video", chat_id, url, caption).await
    }

    async fn send_prompt(
        &self,
        chat_id: ChatId,
        text: &str,
        choices: &[Choice],
    ) -> Result<MessageId, TransportError> {
        let body = json!({
            "chat_id": chat_id.0,
            "text": text,
            "reply_markup": keyboard(choices),
        });
        self.send("sendMessage", body).await
    }

    async fn send_typing(&self, chat_id: ChatId) -> Result<(), TransportError> {
        let body = json!({ "chat_id": chat_id.0, "action": "typing" });
        self.call::<bool>("sendChatAction", body).await.map(|_| ())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        let body = json!({ "callback_query_id": callback_id });
        self.call::<bool>("answerCallbackQuery", body).await.map(|_| ())
    }
}
