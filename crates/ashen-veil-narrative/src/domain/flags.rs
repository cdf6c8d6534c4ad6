//! Narrative flags.
//!
//! Flags are stored on the session as an open string-keyed map so snapshots
//! written by other builds still load. The keys the transition table writes
//! or reads are enumerated by [`Flag`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value recorded under a flag key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// A yes/no fact.
    Bool(bool),
    /// A named choice, e.g. which ending fired.
    Text(String),
}

impl FlagValue {
    /// Whether the value counts as "set" when a transition consults it.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Text(value) => !value.is_empty(),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Flag keys consulted or written by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Listened to the cassette in the package.
    HeardCassette,
    /// Spoke with the Archivist at the town hall.
    MetArchivist,
    /// Spoke with Merrick at the docks.
    MetMerrick,
    /// Merrick handed over the scorched photo.
    MerrickPhoto,
    /// The Archivist hinted at pages that move.
    ArchiveTomorrow,
    /// Called the unknown number.
    CalledNumber,
    /// Brought Lila back in the morgue.
    RevivedLila,
    /// Hid Lila's drawer from whoever answered the call.
    LilaHidden,
    /// Leaked the flood maps to the town.
    LeakedDocuments,
    /// Filed the flood maps away.
    ArchivedMaps,
    /// Burned the flood maps.
    BurnedMaps,
    /// Confronted the Archivist.
    ArchivistConfronted,
    /// Recorded the Archivist's confession.
    RecordedArchivist,
    /// Walked away from the Archivist.
    WalkedAway,
    /// Act 4 route: `break`, `burn` or `hunt`.
    Route,
    /// Ending that fired: `save`, `veil` or `burn`.
    Ending,
}

impl Flag {
    /// Every known flag key.
    pub const ALL: [Self; 16] = [
        Self::HeardCassette,
        Self::MetArchivist,
        Self::MetMerrick,
        Self::MerrickPhoto,
        Self::ArchiveTomorrow,
        Self::CalledNumber,
        Self::RevivedLila,
        Self::LilaHidden,
        Self::LeakedDocuments,
        Self::ArchivedMaps,
        Self::BurnedMaps,
        Self::ArchivistConfronted,
        Self::RecordedArchivist,
        Self::WalkedAway,
        Self::Route,
        Self::Ending,
    ];

    /// Key under which the flag is stored.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::HeardCassette => "heard_cassette",
            Self::MetArchivist => "met_archivist",
            Self::MetMerrick => "met_merrick",
            Self::MerrickPhoto => "merrick_photo",
            Self::ArchiveTomorrow => "archive_tomorrow",
            Self::CalledNumber => "called_number",
            Self::RevivedLila => "revived_lila",
            Self::LilaHidden => "lila_hidden",
            Self::LeakedDocuments => "leaked_documents",
            Self::ArchivedMaps => "archived_maps",
            Self::BurnedMaps => "burned_maps",
            Self::ArchivistConfronted => "archivist_confronted",
            Self::RecordedArchivist => "recorded_archivist",
            Self::WalkedAway => "walked_away",
            Self::Route => "route",
            Self::Ending => "ending",
        }
    }

    /// Looks up a known flag by its stored key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.key() == key)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
