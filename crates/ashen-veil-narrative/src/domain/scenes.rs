//! Fine-grained story positions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The prompt a session is currently waiting on.
///
/// Every transition names the scenes it may fire from; a button pressed
/// while the session waits on any other scene is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    /// Act 1: package, town hall or docks.
    #[default]
    Opening,
    /// Act 2: old home, police archives or forest.
    Fracture,
    /// Act 3: who to confront.
    Investigate,
    /// Merrick pointed at the morgue.
    MerrickLead,
    /// The Archivist is hiding something.
    ArchiveLead,
    /// The voice on the phone left a trail.
    CallLead,
    /// Lila's drawer in the morgue.
    Morgue,
    /// Holding the toe-tag photograph.
    MorguePhoto,
    /// The waterlogged rescue maps.
    Flood,
    /// The maps are filed; the Archivist is watching.
    FloodArchived,
    /// The Archivist's betrayal.
    Archivist,
    /// Act 4: choose a route.
    Collapse,
    /// Act 5: choose an ending.
    Finale,
    /// An ending has played; no choices remain.
    Ending,
}

impl Scene {
    /// Stable lowercase name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Fracture => "fracture",
            Self::Investigate => "investigate",
            Self::MerrickLead => "merrick_lead",
            Self::ArchiveLead => "archive_lead",
            Self::CallLead => "call_lead",
            Self::Morgue => "morgue",
            Self::MorguePhoto => "morgue_photo",
            Self::Flood => "flood",
            Self::FloodArchived => "flood_archived",
            Self::Archivist => "archivist",
            Self::Collapse => "collapse",
            Self::Finale => "finale",
            Self::Ending => "ending",
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
