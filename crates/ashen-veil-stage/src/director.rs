//! Executes render plans.

use std::sync::Arc;
use std::time::Duration;

use ashen_veil_core::ids::ChatId;
use ashen_veil_core::pacer::Pacer;
use ashen_veil_core::transport::{TextStyle, Transport};
use ashen_veil_narrative::domain::render::{RenderDirective, RenderPlan};
use tracing::{debug, instrument, warn};

use crate::animation;

/// Placeholder sent when an image cannot be delivered and has no caption.
pub const IMAGE_PLACEHOLDER: &str = "📷 (image)";
/// Placeholder sent when a video cannot be delivered and has no caption.
pub const VIDEO_PLACEHOLDER: &str = "🎞 (video)";

const PHOTO_TYPING: Duration = Duration::from_millis(800);
const PROMPT_TYPING: Duration = Duration::from_millis(600);

/// Typing time for a message: 0.4 s plus 1 s per 140 characters, capped at 2 s.
#[must_use]
pub fn typing_for(text: &str) -> Duration {
    let chars = u64::try_from(text.chars().count()).unwrap_or(u64::MAX);
    let millis = chars.saturating_mul(1000) / 140;
    Duration::from_millis(400_u64.saturating_add(millis).min(2000))
}

/// Walks a render plan against a transport.
///
/// Every transport failure is absorbed here: media falls back to text, edits
/// fall back to new messages, typing failures are ignored and failed sends
/// are logged before moving to the next directive.
#[derive(Clone)]
pub struct Director {
    transport: Arc<dyn Transport>,
    pacer: Arc<dyn Pacer>,
}

impl std::fmt::Debug for Director {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Director").finish_non_exhaustive()
    }
}

impl Director {
    /// Creates a director.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, pacer: Arc<dyn Pacer>) -> Self {
        Self { transport, pacer }
    }

    /// The transport the director renders to.
    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Sends one message outside any plan, logging a failure.
    pub async fn say(&self, chat_id: ChatId, text: &str, style: TextStyle) {
        if let Err(e) = self.transport.send_text(chat_id, text, style).await {
            warn!(%chat_id, error = %e, "Message send failed");
        }
    }

    /// Renders every directive of `plan` in order.
    #[instrument(skip(self, plan), fields(chat_id = %chat_id, directives = plan.directives.len()))]
    pub async fn perform(&self, chat_id: ChatId, plan: &RenderPlan) {
        for directive in &plan.directives {
            self.render(chat_id, directive).await;
        }
        debug!("Plan rendered");
    }

    async fn typing(&self, chat_id: ChatId, duration: Duration) {
        if let Err(e) = self.transport.send_typing(chat_id).await {
            debug!(%chat_id, error = %e, "Typing indicator failed");
        }
        self.pacer.pause(duration).await;
    }

    async fn render(&self, chat_id: ChatId, directive: &RenderDirective) {
        match directive {
            RenderDirective::Typing(duration) => self.typing(chat_id, *duration).await,
            RenderDirective::Pause(duration) => self.pacer.pause(*duration).await,
            RenderDirective::Text { text, style, typed } => {
                if *typed {
                    self.typing(chat_id, typing_for(text)).await;
                }
                self.say(chat_id, text, *style).await;
            }
            RenderDirective::Photo { asset, caption } => {
                self.typing(chat_id, PHOTO_TYPING).await;
                if let Err(e) = self
                    .transport
                    .send_photo(chat_id, asset.url(), caption.as_deref())
                    .await
                {
                    warn!(%chat_id, asset = asset.key(), error = %e, "Photo send failed, sending text");
                    let fallback = caption.as_deref().unwrap_or(IMAGE_PLACEHOLDER);
                    self.say(chat_id, fallback, TextStyle::Markdown).await;
                }
            }
            RenderDirective::Audio {
                asset,
                caption,
                fallback,
            } => {
                if let Err(e) = self
                    .transport
                    .send_audio(chat_id, asset.url(), caption.as_deref())
                    .await
                {
                    warn!(%chat_id, asset = asset.key(), error = %e, "Audio send failed, sending text");
                    self.say(chat_id, fallback, TextStyle::Markdown).await;
                }
            }
            RenderDirective::Video { asset, caption } => {
                if let Err(e) = self
                    .transport
                    .send_video(chat_id, asset.url(), caption.as_deref())
                    .await
                {
                    warn!(%chat_id, asset = asset.key(), error = %e, "Video send failed, sending text");
                    let fallback = caption.as_deref().unwrap_or(VIDEO_PLACEHOLDER);
                    self.say(chat_id, fallback, TextStyle::Markdown).await;
                }
            }
            RenderDirective::Animate {
                frames,
                style,
                beat,
            } => {
                if let Err(e) = animation::animate(
                    self.transport.as_ref(),
                    self.pacer.as_ref(),
                    chat_id,
                    frames,
                    *style,
                    *beat,
                )
                .await
                {
                    warn!(%chat_id, error = %e, "Animation could not start");
                }
            }
            RenderDirective::Prompt { text, choices } => {
                self.typing(chat_id, PROMPT_TYPING).await;
                if let Err(e) = self.transport.send_prompt(chat_id, text, choices).await {
                    warn!(%chat_id, error = %e, "Prompt send failed");
                }
            }
        }
    }
}
