//! External text generation port.

use async_trait::async_trait;
use thiserror::Error;

/// Failure of an external generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service could not be reached.
    #[error("generation request failed: {0}")]
    Request(String),

    /// The service answered with an error status.
    #[error("generation service returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the body, or the raw body.
        message: String,
    },

    /// The response carried no usable text.
    #[error("generation response unusable: {0}")]
    Malformed(String),

    /// The call did not finish in time.
    #[error("generation timed out")]
    Timeout,
}

/// Produces one in-character line for an NPC.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a reply from `npc_name` to `utterance`. `context` is a short
    /// description of where the story stands, if known.
    async fn generate(
        &self,
        npc_name: &str,
        utterance: &str,
        context: Option<&str>,
    ) -> Result<String, GenerationError>;
}

impl std::fmt::Debug for dyn TextGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TextGenerator")
    }
}
