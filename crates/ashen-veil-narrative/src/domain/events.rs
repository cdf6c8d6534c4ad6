//! Domain events produced by the transition table.
//!
//! A transition never mutates a session directly. It returns the events it
//! wants recorded and the aggregate applies them, so the same list can be
//! logged and returned to the caller as the "resulting mutation".

use serde::{Deserialize, Serialize};

use super::acts::Act;
use super::flags::FlagValue;
use super::scenes::Scene;

/// A single change to a story session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoryEvent {
    /// A flag was written (later writes overwrite earlier ones).
    FlagRecorded {
        /// Flag key.
        key: String,
        /// Value written.
        value: FlagValue,
    },
    /// A clue was appended to the evidence log.
    EvidenceCollected {
        /// Clue identifier.
        item: String,
    },
    /// The session moved to a later act.
    ActAdvanced {
        /// Target act. Applying never lowers the current act.
        act: Act,
    },
    /// The session now waits on a new prompt.
    SceneEntered {
        /// The scene being waited on.
        scene: Scene,
    },
}

impl StoryEvent {
    /// Returns the event type name (used for logging).
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::FlagRecorded { .. } => "story.flag_recorded",
            Self::EvidenceCollected { .. } => "story.evidence_collected",
            Self::ActAdvanced { .. } => "story.act_advanced",
            Self::SceneEntered { .. } => "story.scene_entered",
        }
    }
}
