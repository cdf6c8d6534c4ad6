//! OpenAI-compatible chat completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generator::{GenerationError, TextGenerator};

/// Longest player utterance forwarded, in characters.
pub const MAX_UTTERANCE_CHARS: usize = 800;
/// Sampling temperature.
pub const TEMPERATURE: f32 = 0.8;
/// Output cap.
pub const MAX_TOKENS: u32 = 120;

/// Generator calling `{base_url}/chat/completions`.
#[derive(Clone)]
pub struct OpenAiChatGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for OpenAiChatGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatGenerator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiChatGenerator {
    /// Creates a generator for `model` at `base_url` (e.g.
    /// `https://api.openai.com/v1`).
    #[must_use]
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn request(&self, npc_name: &str, utterance: &str, context: Option<&str>) -> ChatCompletionRequest {
        let mut system = format!(
            "You are {npc_name}, a character in a moody cinematic mystery. \
             Reply briefly (<= 2 sentences), in-character, atmospheric, and emotional."
        );
        if let Some(context) = context {
            system.push(' ');
            system.push_str(context);
        }
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: utterance.chars().take(MAX_UTTERANCE_CHARS).collect(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatGenerator {
    async fn generate(
        &self,
        npc_name: &str,
        utterance: &str,
        context: Option<&str>,
    ) -> Result<String, GenerationError> {
        let body = self.request(npc_name, utterance, context);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable error body".to_owned());
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map_or(text, |wrapper| wrapper.error.message);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| GenerationError::Malformed("no content in response".into()))?;
        debug!(npc = npc_name, chars = text.len(), "Generated NPC reply");
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ResponseChoice>,
}

#[derive(Deserialize)]
struct ResponseChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
