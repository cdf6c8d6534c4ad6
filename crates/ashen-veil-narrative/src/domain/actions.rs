//! The closed vocabulary of button tokens.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Token carried by an inline button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionToken {
    /// Inspect the package.
    A1Pkg,
    /// Go to the town hall.
    A1Hall,
    /// Go to the docks.
    A1Docks,
    /// Visit the old home.
    A2Home,
    /// Search the police archives.
    A2Arch,
    /// Walk to the forest clearing.
    A2Forest,
    /// Confront Merrick at the bar.
    A3Merrick,
    /// Confront the Archivist.
    A3Archivist,
    /// Call the unknown number.
    A3Call,
    /// Enter the morgue.
    GotoMorgue,
    /// Open the flood records.
    GotoFlood,
    /// Press the Archivist for answers.
    ArchPress,
    /// Attempt to revive Lila.
    MorgRevive,
    /// Call for help in the morgue.
    MorgCall,
    /// Photograph the toe tag.
    MorgPhoto,
    /// Leak the flood maps.
    FloodLeak,
    /// File the flood maps in the archive.
    FloodArchive,
    /// Burn the flood maps.
    FloodBurn,
    /// Confront the Archivist and demand the truth.
    ArchConfront,
    /// Secretly record the Archivist.
    ArchRecord,
    /// Walk away from the Archivist.
    ArchLeave,
    /// Act 4: break the cycle.
    A4Break,
    /// Act 4: let it burn.
    A4Burn,
    /// Act 4: hunt your other self.
    A4Hunt,
    /// Ending: save the girl.
    EndSave,
    /// Ending: break the veil.
    EndVeil,
    /// Ending: let it burn.
    EndBurn,
}

/// Returned when a callback payload is not part of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action token: {0}")]
pub struct UnknownAction(pub String);

impl ActionToken {
    /// Every token in the vocabulary.
    pub const ALL: [Self; 27] = [
        Self::A1Pkg,
        Self::A1Hall,
        Self::A1Docks,
        Self::A2Home,
        Self::A2Arch,
        Self::A2Forest,
        Self::A3Merrick,
        Self::A3Archivist,
        Self::A3Call,
        Self::GotoMorgue,
        Self::GotoFlood,
        Self::ArchPress,
        Self::MorgRevive,
        Self::MorgCall,
        Self::MorgPhoto,
        Self::FloodLeak,
        Self::FloodArchive,
        Self::FloodBurn,
        Self::ArchConfront,
        Self::ArchRecord,
        Self::ArchLeave,
        Self::A4Break,
        Self::A4Burn,
        Self::A4Hunt,
        Self::EndSave,
        Self::EndVeil,
        Self::EndBurn,
    ];

    /// Wire form of the token, as carried in button callback data.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A1Pkg => "a1_pkg",
            Self::A1Hall => "a1_hall",
            Self::A1Docks => "a1_docks",
            Self::A2Home => "a2_home",
            Self::A2Arch => "a2_arch",
            Self::A2Forest => "a2_forest",
            Self::A3Merrick => "a3_merrick",
            Self::A3Archivist => "a3_archivist",
            Self::A3Call => "a3_call",
            Self::GotoMorgue => "goto_morgue",
            Self::GotoFlood => "goto_flood",
            Self::ArchPress => "arch_press",
            Self::MorgRevive => "morg_revive",
            Self::MorgCall => "morg_call",
            Self::MorgPhoto => "morg_photo",
            Self::FloodLeak => "flood_leak",
            Self::FloodArchive => "flood_archive",
            Self::FloodBurn => "flood_burn",
            Self::ArchConfront => "arch_confront",
            Self::ArchRecord => "arch_record",
            Self::ArchLeave => "arch_leave",
            Self::A4Break => "a4_break",
            Self::A4Burn => "a4_burn",
            Self::A4Hunt => "a4_hunt",
            Self::EndSave => "end_save",
            Self::EndVeil => "end_veil",
            Self::EndBurn => "end_burn",
        }
    }

    /// Whether the token fires one of the three endings.
    #[must_use]
    pub fn is_ending(self) -> bool {
        matches!(self, Self::EndSave | Self::EndVeil | Self::EndBurn)
    }
}

impl FromStr for ActionToken {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|token| token.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_owned()))
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_token_parses_from_its_wire_form() {
        for token in ActionToken::ALL {
            assert_eq!(token.as_str().parse::<ActionToken>(), Ok(token));
        }
    }

    #[test]
    fn test_unknown_payload_is_rejected() {
        let result = "a6_epilogue".parse::<ActionToken>();

        assert_eq!(result, Err(UnknownAction("a6_epilogue".to_owned())));
    }

    #[test]
    fn test_only_three_tokens_are_endings() {
        let endings: Vec<_> = ActionToken::ALL
            .into_iter()
            .filter(|token| token.is_ending())
            .collect();

        assert_eq!(
            endings,
            vec![ActionToken::EndSave, ActionToken::EndVeil, ActionToken::EndBurn]
        );
    }
}
