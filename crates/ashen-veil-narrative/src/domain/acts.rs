//! Coarse story stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse stage of a playthrough. Ordered: a session's act never decreases
/// except when the story is restarted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Act {
    /// Homecoming and the first lead.
    #[default]
    Act1,
    /// The town fractures.
    Act2,
    /// Interrogations and the side arcs.
    Act3,
    /// Collapse of the timeline.
    Act4,
    /// The finale.
    Act5,
    /// An ending has fired.
    End,
}

impl Act {
    /// Returns `true` once an ending has fired.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::End
    }

    /// Stable lowercase name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Act1 => "act1",
            Self::Act2 => "act2",
            Self::Act3 => "act3",
            Self::Act4 => "act4",
            Self::Act5 => "act5",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Act {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
