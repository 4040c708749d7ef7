//! Card-related types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a card within a deck.
///
/// This is the only field used to correlate local state with the remote store.
pub type CardKey = i64;

/// Difficulty tier of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Introductory vocabulary.
    Easy,
    /// The tier assumed when a card carries none.
    #[default]
    Medium,
    /// Advanced vocabulary.
    Hard,
}

impl Difficulty {
    /// Lowercase name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vocabulary card.
///
/// # Example
///
/// ```
/// use drillkit::{Card, Difficulty};
///
/// let card = Card::new(1, "Hola", "Hello", "¡Hola! ¿Cómo estás?")
///     .with_difficulty(Difficulty::Easy);
///
/// assert_eq!(card.tier(), Difficulty::Easy);
/// assert!(!card.is_known());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Identity key, unique within a deck.
    #[serde(rename = "row_number", alias = "id", alias = "key")]
    pub key: CardKey,
    /// Source-language term.
    #[serde(rename = "spanish", alias = "term")]
    pub term: String,
    /// Target-language gloss.
    #[serde(rename = "english", alias = "gloss")]
    pub gloss: String,
    /// Example sentence using the term.
    #[serde(default)]
    pub usage: String,
    /// Difficulty tier, if the source assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Mastery flag. `None` means the card has not been assessed yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known: Option<bool>,
    /// Cumulative number of correct quiz answers recorded remotely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times_learned: Option<u32>,
}

impl Card {
    /// Create an unassessed card with no difficulty tier.
    pub fn new(
        key: CardKey,
        term: impl Into<String>,
        gloss: impl Into<String>,
        usage: impl Into<String>,
    ) -> Self {
        Self {
            key,
            term: term.into(),
            gloss: gloss.into(),
            usage: usage.into(),
            difficulty: None,
            known: None,
            times_learned: None,
        }
    }

    /// Set the difficulty tier.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Set the mastery flag.
    pub fn with_known(mut self, known: bool) -> Self {
        self.known = Some(known);
        self
    }

    /// Set the times-learned counter.
    pub fn with_times_learned(mut self, count: u32) -> Self {
        self.times_learned = Some(count);
        self
    }

    /// Difficulty tier, defaulting to [`Difficulty::Medium`].
    pub fn tier(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }

    /// Whether the card is flagged as known.
    pub fn is_known(&self) -> bool {
        self.known == Some(true)
    }
}
