//! Template replies.

use std::sync::{Mutex, PoisonError};

use ashen_veil_core::rng::DeterministicRng;

/// Words that mark a question.
const INTERROGATIVES: [&str; 6] = ["where", "who", "why", "how", "when", "what"];
/// Words that mark a plea.
const DISTRESS: [&str; 5] = ["save", "help", "please", "can't", "won't"];

/// Replies to questions.
pub const MYSTERY_LINES: [&str; 3] = [
    "The town keeps maps of lies in its drawers.",
    "Ask the Archivist — every paper is a riddle.",
    "Sometimes the answer is a name you don't know you remember.",
];

/// Replies to pleas.
pub const COMFORT_LINES: [&str; 3] = [
    "Stay with me. We'll breathe together until dawn.",
    "I can feel the rain on the other side of the glass. It's colder there.",
    "We choose people over truths when we're afraid.",
];

/// Replies to everything else.
pub const ATMOSPHERE_LINES: [&str; 3] = [
    "I dreamed of the chapel last night. It had no roof but kept singing.",
    "You move like someone who knows the final line but not the first word.",
    "If you listen very carefully, the town will tell you what it wants to forget.",
];

/// Which pool an utterance draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// The player asked something.
    Mystery,
    /// The player pleaded.
    Comfort,
    /// Anything else.
    Atmosphere,
}

impl Bucket {
    /// Lines in the pool.
    #[must_use]
    pub fn lines(self) -> &'static [&'static str; 3] {
        match self {
            Self::Mystery => &MYSTERY_LINES,
            Self::Comfort => &COMFORT_LINES,
            Self::Atmosphere => &ATMOSPHERE_LINES,
        }
    }
}

/// Classifies an utterance by whole-word keyword membership. Questions win
/// over pleas.
#[must_use]
pub fn classify(utterance: &str) -> Bucket {
    let lowered = utterance.to_lowercase().replace('’', "'");
    let words: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|word| !word.is_empty())
        .collect();
    let mentions = |keywords: &[&str]| words.iter().any(|word| keywords.contains(word));

    if mentions(&INTERROGATIVES) {
        Bucket::Mystery
    } else if mentions(&DISTRESS) {
        Bucket::Comfort
    } else {
        Bucket::Atmosphere
    }
}

/// Picks a uniformly random line from the utterance's bucket.
pub struct TemplateResponder {
    rng: Mutex<Box<dyn DeterministicRng>>,
}

impl std::fmt::Debug for TemplateResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateResponder").finish_non_exhaustive()
    }
}

impl TemplateResponder {
    /// Creates a responder drawing from `rng`.
    #[must_use]
    pub fn new(rng: Box<dyn DeterministicRng>) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// One line for `utterance`.
    pub fn reply(&self, utterance: &str) -> &'static str {
        let lines = classify(utterance).lines();
        let index = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pick_index(lines.len());
        lines[index % lines.len()]
    }
}

#[cfg(test)]
mod tests {
    use ashen_veil_test_support::{MockRng, SequenceRng};

    use super::*;

    #[test]
    fn test_why_always_draws_from_mystery_lines() {
        // Arrange
        let responder = TemplateResponder::new(Box::new(SequenceRng::new(vec![0, 1, 2, 3, 4])));

        // Act
        let replies: Vec<_> = (0..5)
            .map(|_| responder.reply("Why is the rain salty?"))
            .collect();

        // Assert
        assert!(replies.iter().all(|line| MYSTERY_LINES.contains(line)));
        assert_eq!(replies[0], MYSTERY_LINES[0]);
        assert_eq!(replies[2], MYSTERY_LINES[2]);
    }

    #[test]
    fn test_help_always_draws_from_comfort_lines() {
        let responder = TemplateResponder::new(Box::new(SequenceRng::new(vec![0, 1, 2])));

        for _ in 0..3 {
            assert!(COMFORT_LINES.contains(&responder.reply("help me")));
        }
    }

    #[test]
    fn test_other_utterances_draw_from_atmosphere_lines() {
        let responder = TemplateResponder::new(Box::new(MockRng));

        assert_eq!(responder.reply("nice weather"), ATMOSPHERE_LINES[0]);
    }

    #[test]
    fn test_classify_matches_whole_words_case_insensitively() {
        assert_eq!(classify("WHERE did she go"), Bucket::Mystery);
        assert_eq!(classify("what now"), Bucket::Mystery);
        assert_eq!(classify("I can’t breathe"), Bucket::Comfort);
        assert_eq!(classify("Please."), Bucket::Comfort);
        assert_eq!(classify("show me the whole town"), Bucket::Atmosphere);
    }

    #[test]
    fn test_questions_take_priority_over_pleas() {
        assert_eq!(classify("why won't you help"), Bucket::Mystery);
    }
}
