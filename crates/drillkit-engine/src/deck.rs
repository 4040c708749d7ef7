//! The per-session card collection.
//!
//! A [`Deck`] is an immutable snapshot of the card source. Derived views
//! (the active learning set, a shuffled working order) are new values; the
//! source collection is never mutated.

use std::collections::HashSet;
#[cfg(feature = "files")]
use std::path::Path;

use drillkit::{Card, CardKey};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::shuffle::Shuffler;

/// An ordered collection of cards with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

/// Counts shown in the word list header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeckStats {
    /// Number of cards.
    pub total: usize,
    /// Cards flagged as known.
    pub known: usize,
    /// Cards explicitly flagged as not known.
    pub learning: usize,
    /// Cards never assessed.
    pub unseen: usize,
}

#[cfg(feature = "files")]
#[derive(serde::Deserialize)]
struct DeckFile {
    #[serde(default)]
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck, rejecting duplicate keys.
    ///
    /// ```
    /// use drillkit_engine::{Card, Deck};
    ///
    /// let deck = Deck::new(vec![
    ///     Card::new(1, "Hola", "Hello", "¡Hola!"),
    ///     Card::new(2, "Gracias", "Thank you", "Muchas gracias."),
    /// ])
    /// .unwrap();
    /// assert_eq!(deck.len(), 2);
    ///
    /// let dup = Deck::new(vec![
    ///     Card::new(1, "Hola", "Hello", ""),
    ///     Card::new(1, "Adiós", "Goodbye", ""),
    /// ]);
    /// assert!(dup.is_err());
    /// ```
    pub fn new(cards: Vec<Card>) -> Result<Self> {
        let mut keys = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !keys.insert(card.key) {
                return Err(Error::DuplicateKey(card.key));
            }
        }
        Ok(Self { cards })
    }

    /// The cards in source order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Iterate over the cards in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look up a card by key.
    pub fn get(&self, key: CardKey) -> Option<&Card> {
        self.cards.iter().find(|c| c.key == key)
    }

    /// All keys in source order.
    pub fn keys(&self) -> Vec<CardKey> {
        self.cards.iter().map(|c| c.key).collect()
    }

    /// The active learning set: cards not flagged as known, ordered by key.
    ///
    /// May be empty.
    pub fn active_subset(&self) -> Deck {
        let mut cards: Vec<Card> = self.cards.iter().filter(|c| !c.is_known()).cloned().collect();
        cards.sort_by_key(|c| c.key);
        Deck { cards }
    }

    /// A fresh permutation of the cards for a session's working order.
    pub fn shuffled_order<S: Shuffler>(&self, shuffler: &mut S) -> Vec<Card> {
        let mut order = self.cards.clone();
        shuffler.shuffle(&mut order);
        order
    }

    /// Known / learning / unseen counts.
    pub fn stats(&self) -> DeckStats {
        let mut stats = DeckStats {
            total: self.cards.len(),
            ..Default::default()
        };
        for card in &self.cards {
            match card.known {
                Some(true) => stats.known += 1,
                Some(false) => stats.learning += 1,
                None => stats.unseen += 1,
            }
        }
        stats
    }

    /// Parse a JSON array of card records, as the webhook serves them.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let cards: Vec<Card> = serde_json::from_str(content)?;
        Self::new(cards)
    }

    /// Parse a TOML deck file made of `[[cards]]` tables.
    ///
    /// ```
    /// use drillkit_engine::Deck;
    ///
    /// let deck = Deck::from_toml_str(r#"
    /// [[cards]]
    /// id = 1
    /// term = "Hola"
    /// gloss = "Hello"
    /// usage = "¡Hola! ¿Cómo estás?"
    /// difficulty = "easy"
    /// "#).unwrap();
    ///
    /// assert_eq!(deck.cards()[0].term, "Hola");
    /// ```
    #[cfg(feature = "files")]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: DeckFile = toml::from_str(content)?;
        Self::new(file.cards)
    }

    /// Read a deck file, choosing the format by extension (`.toml` or `.json`).
    #[cfg(feature = "files")]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::{NoShuffle, SeededShuffler};

    fn deck() -> Deck {
        Deck::new(vec![
            Card::new(5, "e", "E", "").with_known(false),
            Card::new(2, "b", "B", "").with_known(true),
            Card::new(9, "i", "I", ""),
            Card::new(1, "a", "A", "").with_known(false),
            Card::new(4, "d", "D", "").with_known(true),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = Deck::new(vec![Card::new(1, "a", "A", ""), Card::new(1, "b", "B", "")]);
        assert!(matches!(result, Err(Error::DuplicateKey(1))));
    }

    #[test]
    fn test_active_subset() {
        let source = deck();
        let active = source.active_subset();

        assert_eq!(active.keys(), vec![1, 5, 9]);
        assert!(active.iter().all(|c| !c.is_known()));
        assert!(active.iter().all(|c| source.get(c.key) == Some(c)));
        // Source untouched.
        assert_eq!(source.keys(), vec![5, 2, 9, 1, 4]);
    }

    #[test]
    fn test_active_subset_can_be_empty() {
        let all_known = Deck::new(vec![Card::new(1, "a", "A", "").with_known(true)]).unwrap();
        assert!(all_known.active_subset().is_empty());
        assert!(Deck::default().active_subset().is_empty());
    }

    #[test]
    fn test_shuffled_order_is_permutation() {
        let source = deck();
        let order = source.shuffled_order(&mut SeededShuffler::new(11));

        let mut keys: Vec<_> = order.iter().map(|c| c.key).collect();
        keys.sort();
        assert_eq!(keys, vec![1, 2, 4, 5, 9]);
        assert_eq!(source.keys(), vec![5, 2, 9, 1, 4]);

        let unshuffled = source.shuffled_order(&mut NoShuffle);
        assert_eq!(unshuffled, source.cards());
    }

    #[test]
    fn test_stats() {
        let stats = deck().stats();
        assert_eq!(
            stats,
            DeckStats {
                total: 5,
                known: 2,
                learning: 2,
                unseen: 1,
            }
        );
    }

    #[test]
    fn test_from_json_str() {
        let deck = Deck::from_json_str(
            r#"[{"row_number": 3, "spanish": "Hola", "english": "Hello", "usage": "¡Hola!"}]"#,
        )
        .unwrap();
        assert_eq!(deck.get(3).map(|c| c.gloss.as_str()), Some("Hello"));
        assert!(matches!(Deck::from_json_str("{"), Err(Error::Json(_))));
    }

    #[test]
    #[cfg(feature = "files")]
    fn test_from_toml_str_rejects_duplicates() {
        let result = Deck::from_toml_str(
            r#"
[[cards]]
id = 1
term = "a"
gloss = "A"

[[cards]]
id = 1
term = "b"
gloss = "B"
"#,
        );
        assert!(matches!(result, Err(Error::DuplicateKey(1))));
    }
}
