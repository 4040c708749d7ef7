//! Mastery update types pushed to the remote store.

use serde::{Deserialize, Serialize};

use super::CardKey;

/// Target mastery state for one card.
///
/// Flip-card review persists a boolean flag; quiz modes persist a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryUpdate {
    /// Set the card's "known" flag.
    Known(bool),
    /// Set the card's cumulative "times learned" counter.
    TimesLearned(u32),
}

/// A single entry of a mastery batch.
///
/// Serializes flat, e.g. `{"row_number": 4, "known": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUpdate {
    /// The card being updated.
    #[serde(rename = "row_number")]
    pub key: CardKey,
    /// The state to write.
    #[serde(flatten)]
    pub update: MasteryUpdate,
}

impl CardUpdate {
    /// Create an update entry.
    pub fn new(key: CardKey, update: MasteryUpdate) -> Self {
        Self { key, update }
    }

    /// Shorthand for a boolean "known" update.
    pub fn known(key: CardKey, known: bool) -> Self {
        Self::new(key, MasteryUpdate::Known(known))
    }

    /// Shorthand for a "times learned" update.
    pub fn times_learned(key: CardKey, count: u32) -> Self {
        Self::new(key, MasteryUpdate::TimesLearned(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_update_wire_shape() {
        let value = serde_json::to_value(CardUpdate::known(4, true)).unwrap();
        assert_eq!(value, serde_json::json!({"row_number": 4, "known": true}));
    }

    #[test]
    fn test_counter_update_wire_shape() {
        let value = serde_json::to_value(CardUpdate::times_learned(9, 3)).unwrap();
        assert_eq!(value, serde_json::json!({"row_number": 9, "times_learned": 3}));
    }
}
