//! Test transports — mock `Transport` implementations for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ashen_veil_core::ids::{ChatId, MessageId};
use ashen_veil_core::transport::{Choice, TextStyle, Transport, TransportError};
use async_trait::async_trait;

use crate::pacer::RecordingPacer;

/// One entry in a recording transport's log.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    /// A new text message.
    Text {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        style: TextStyle,
    },
    /// A successful in-place edit.
    Edited {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    /// An edit the transport refused.
    EditRejected {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    /// An image.
    Photo {
        chat_id: ChatId,
        url: String,
        caption: Option<String>,
    },
    /// An audio clip.
    Audio {
        chat_id: ChatId,
        url: String,
        caption: Option<String>,
    },
    /// A video.
    Video {
        chat_id: ChatId,
        url: String,
        caption: Option<String>,
    },
    /// A button prompt.
    Prompt {
        chat_id: ChatId,
        text: String,
        choices: Vec<Choice>,
    },
    /// A typing indicator.
    Typing { chat_id: ChatId },
    /// A callback acknowledgement.
    CallbackAnswered { callback_id: String },
    /// A wait recorded by a pacer sharing this log.
    Paused(Duration),
}

/// A transport that records every call and hands out increasing message IDs.
///
/// Individual edit attempts (counted from zero), all edits, or all media sends
/// can be configured to fail with [`TransportError::Rejected`].
#[derive(Debug, Default)]
pub struct RecordingTransport {
    log: Arc<Mutex<Vec<Sent>>>,
    next_id: AtomicI64,
    edit_attempts: AtomicUsize,
    failing_edit_attempts: HashSet<usize>,
    fail_all_edits: bool,
    fail_media: bool,
    fail_typing: bool,
    slow_callbacks: HashMap<String, Duration>,
    text_send_limit: Option<usize>,
    text_sends: AtomicUsize,
}

impl RecordingTransport {
    /// Creates a transport on which every call succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every edit.
    #[must_use]
    pub fn failing_edits(mut self) -> Self {
        self.fail_all_edits = true;
        self
    }

    /// Rejects the edit attempts with the given zero-based indices.
    #[must_use]
    pub fn failing_edit_attempts(mut self, attempts: impl IntoIterator<Item = usize>) -> Self {
        self.failing_edit_attempts.extend(attempts);
        self
    }

    /// Rejects every photo, audio and video send.
    #[must_use]
    pub fn failing_media(mut self) -> Self {
        self.fail_media = true;
        self
    }

    /// Rejects every typing indicator.
    #[must_use]
    pub fn failing_typing(mut self) -> Self {
        self.fail_typing = true;
        self
    }

    /// Accepts the first `limit` text sends and rejects the rest.
    #[must_use]
    pub fn failing_sends_after(mut self, limit: usize) -> Self {
        self.text_send_limit = Some(limit);
        self
    }

    /// Holds the acknowledgement of `callback_id` for `delay` of real time
    /// before recording it.
    #[must_use]
    pub fn slow_callback(mut self, callback_id: impl Into<String>, delay: Duration) -> Self {
        self.slow_callbacks.insert(callback_id.into(), delay);
        self
    }

    /// A pacer that records into this transport's log.
    #[must_use]
    pub fn pacer(&self) -> RecordingPacer {
        RecordingPacer::sharing(Arc::clone(&self.log))
    }

    /// Snapshot of everything recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<Sent> {
        self.log.lock().unwrap().clone()
    }

    /// Text states the player saw, in order: new text messages and successful
    /// edits.
    pub fn displayed_texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|entry| match entry {
                Sent::Text { text, .. } | Sent::Edited { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Every text, caption and prompt shown to the player, in order.
    pub fn visible_texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|entry| match entry {
                Sent::Text { text, .. } | Sent::Edited { text, .. } | Sent::Prompt { text, .. } => {
                    Some(text)
                }
                Sent::Photo { caption, .. }
                | Sent::Audio { caption, .. }
                | Sent::Video { caption, .. } => caption,
                _ => None,
            })
            .collect()
    }

    /// Number of entries matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Sent) -> bool) -> usize {
        self.sent().iter().filter(|entry| predicate(entry)).count()
    }

    fn record(&self, entry: Sent) {
        self.log.lock().unwrap().push(entry);
    }

    fn next_message_id(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn media(&self, entry: Sent) -> Result<MessageId, TransportError> {
        if self.fail_media {
            return Err(TransportError::Rejected("wrong file identifier".into()));
        }
        self.record(entry);
        Ok(self.next_message_id())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        style: TextStyle,
    ) -> Result<MessageId, TransportError> {
        let attempt = self.text_sends.fetch_add(1, Ordering::SeqCst);
        if self.text_send_limit.is_some_and(|limit| attempt >= limit) {
            return Err(TransportError::Unavailable("connection reset".into()));
        }
        let message_id = self.next_message_id();
        self.record(Sent::Text {
            chat_id,
            message_id,
            text: text.to_owned(),
            style,
        });
        Ok(message_id)
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        _style: TextStyle,
    ) -> Result<(), TransportError> {
        let attempt = self.edit_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_all_edits || self.failing_edit_attempts.contains(&attempt) {
            self.record(Sent::EditRejected {
                chat_id,
                message_id,
                text: text.to_owned(),
            });
            return Err(TransportError::Rejected("message can't be edited".into()));
        }
        self.record(Sent::Edited {
            chat_id,
            message_id,
            text: text.to_owned(),
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<MessageId, TransportError> {
        self.media(Sent::Photo {
            chat_id,
            url: url.to_owned(),
            caption: caption.map(str::to_owned),
        })
    }

    async fn send_audio(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<MessageId, TransportError> {
        self.media(Sent::Audio {
            chat_id,
            url: url.to_owned(),
            caption: caption.map(str::to_owned),
        })
    }

    async fn send_video(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<MessageId, TransportError> {
        self.media(Sent::Video {
            chat_id,
            url: url.to_owned(),
            caption: caption.map(str::to_owned),
        })
    }

    async fn send_prompt(
        &self,
        chat_id: ChatId,
        text: &str,
        choices: &[Choice],
    ) -> Result<MessageId, TransportError> {
        self.record(Sent::Prompt {
            chat_id,
            text: text.to_owned(),
            choices: choices.to_vec(),
        });
        Ok(self.next_message_id())
    }

    async fn send_typing(&self, chat_id: ChatId) -> Result<(), TransportError> {
        if self.fail_typing {
            return Err(TransportError::Unavailable("timed out".into()));
        }
        self.record(Sent::Typing { chat_id });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        if let Some(delay) = self.slow_callbacks.get(callback_id) {
            tokio::time::sleep(*delay).await;
        }
        self.record(Sent::CallbackAnswered {
            callback_id: callback_id.to_owned(),
        });
        Ok(())
    }
}

/// A transport on which every call fails. Useful for testing that rendering
/// never propagates transport errors.
#[derive(Debug)]
pub struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn send_text(
        &self,
        _chat_id: ChatId,
        _text: &str,
        _style: TextStyle,
    ) -> Result<MessageId, TransportError> {
        Err(TransportError::Unavailable("connection refused".into()))
    }

    async fn edit_text(
        &self,
        _chat_id: ChatId,
        _message_id: MessageId,
        _text: &str,
        _style: TextStyle,
    ) -> Result<(), TransportError> {
        Err(TransportError::Unavailable("connection refused".into()))
    }

    async fn send_photo(
        &self,
        _chat_id: ChatId,
        _url: &str,
        _caption: Option<&str>,
    ) -> Result<MessageId, TransportError> {
        Err(TransportError::Unavailable("connection refused".into()))
    }

    async fn send_audio(
        &self,
        _chat_id: ChatId,
        _url: &str,
        _caption: Option<&str>,
    ) -> Result<MessageId, TransportError> {
        Err(TransportError::Unavailable("connection refused".into()))
    }

    async fn send_video(
        &self,
        _chat_id: ChatId,
        _url: &str,
        _caption: Option<&str>,
    ) -> Result<MessageId, TransportError> {
        Err(TransportError::Unavailable("connection refused".into()))
    }

    async fn send_prompt(
        &self,
        _chat_id: ChatId,
        _text: &str,
        _choices: &[Choice],
    ) -> Result<MessageId, TransportError> {
        Err(TransportError::Unavailable("connection refused".into()))
    }

    async fn send_typing(&self, _chat_id: ChatId) -> Result<(), TransportError> {
        Err(TransportError::Unavailable("connection refused".into()))
    }

    async fn answer_callback(&self, _callback_id: &str) -> Result<(), TransportError> {
        Err(TransportError::Unavailable("connection refused".into()))
    }
}
