//! Strategy selection.

use std::sync::Arc;
use std::time::Duration;

use ashen_veil_narrative::domain::aggregates::Session;
use tracing::{info, instrument, warn};

use crate::generator::{GenerationError, TextGenerator};
use crate::template::TemplateResponder;

/// NPC reply strategy, chosen once at startup.
#[derive(Debug)]
pub enum NpcResponder {
    /// Template pool only.
    Template(TemplateResponder),
    /// External generator, falling back to the template pool.
    Generated {
        /// The generator.
        generator: Arc<dyn TextGenerator>,
        /// Upper bound on one generation call.
        timeout: Duration,
        /// Used whenever generation fails.
        fallback: TemplateResponder,
    },
}

impl NpcResponder {
    /// Strategy name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Template(_) => "template",
            Self::Generated { .. } => "generated",
        }
    }

    /// One to two sentences from `npc_name` in reply to `utterance`. Never
    /// fails.
    #[instrument(skip(self, utterance, session), fields(strategy = self.kind()))]
    pub async fn reply(&self, npc_name: &str, utterance: &str, session: Option<&Session>) -> String {
        match self {
            Self::Template(template) => template.reply(utterance).to_owned(),
            Self::Generated {
                generator,
                timeout,
                fallback,
            } => {
                let context = session.map(|s| format!("The story is in {}.", s.act()));
                let call = generator.generate(npc_name, utterance, context.as_deref());
                let result = tokio::time::timeout(*timeout, call)
                    .await
                    .unwrap_or(Err(GenerationError::Timeout));
                match result {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "NPC generation failed, using template");
                        let line = fallback.reply(utterance);
                        info!(bucket_line = line, "Template fallback reply");
                        line.to_owned()
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use ashen_veil_core::ids::{ChatId, UserId};
    use ashen_veil_test_support::MockRng;

    use super::*;
    use crate::template::{ATMOSPHERE_LINES, COMFORT_LINES, MYSTERY_LINES};

    struct ScriptedGenerator(Result<&'static str, ()>);

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _npc_name: &str,
            _utterance: &str,
            _context: Option<&str>,
        ) -> Result<String, GenerationError> {
            self.0
                .map(str::to_owned)
                .map_err(|()| GenerationError::Request("connection refused".into()))
        }
    }

    struct HangingGenerator;

    #[async_trait]
    impl TextGenerator for HangingGenerator {
        async fn generate(
            &self,
            _npc_name: &str,
            _utterance: &str,
            _context: Option<&str>,
        ) -> Result<String, GenerationError> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct ContextCapture(AtomicUsize, std::sync::Mutex<Option<String>>);

    #[async_trait]
    impl TextGenerator for ContextCapture {
        async fn generate(
            &self,
            _npc_name: &str,
            _utterance: &str,
            context: Option<&str>,
        ) -> Result<String, GenerationError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            *self.1.lock().unwrap() = context.map(str::to_owned);
            Ok("ok".into())
        }
    }

    fn generated(generator: Arc<dyn TextGenerator>) -> NpcResponder {
        NpcResponder::Generated {
            generator,
            timeout: Duration::from_secs(15),
            fallback: TemplateResponder::new(Box::new(MockRng)),
        }
    }

    #[tokio::test]
    async fn test_template_strategy_uses_keyword_buckets() {
        let responder = NpcResponder::Template(TemplateResponder::new(Box::new(MockRng)));

        assert!(MYSTERY_LINES.contains(&responder.reply("merrick", "why?", None).await.as_str()));
        assert!(COMFORT_LINES.contains(&responder.reply("merrick", "help", None).await.as_str()));
        assert!(ATMOSPHERE_LINES.contains(&responder.reply("merrick", "hi", None).await.as_str()));
    }

    #[tokio::test]
    async fn test_generated_strategy_returns_generator_text() {
        let responder = generated(Arc::new(ScriptedGenerator(Ok("Smoke remembers."))));

        let reply = responder.reply("lila", "who are you", None).await;

        assert_eq!(reply, "Smoke remembers.");
    }

    #[tokio::test]
    async fn test_generated_strategy_falls_back_on_failure() {
        let responder = generated(Arc::new(ScriptedGenerator(Err(()))));

        let reply = responder.reply("lila", "why", None).await;

        assert_eq!(reply, MYSTERY_LINES[0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generated_strategy_falls_back_on_timeout() {
        let responder = generated(Arc::new(HangingGenerator));

        let reply = responder.reply("lila", "please", None).await;

        assert_eq!(reply, COMFORT_LINES[0]);
    }

    #[tokio::test]
    async fn test_generated_strategy_passes_current_act_as_context() {
        // Arrange
        let capture = Arc::new(ContextCapture::default());
        let responder = generated(capture.clone());
        let session = Session::new(ChatId(1), UserId(1), None);

        // Act
        responder.reply("merrick", "hello", Some(&session)).await;

        // Assert
        assert_eq!(capture.0.load(Ordering::SeqCst), 1);
        assert_eq!(
            capture.1.lock().unwrap().as_deref(),
            Some("The story is in act1.")
        );
    }
}
