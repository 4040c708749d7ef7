//! Fill-in-the-blank prompts derived from a card's example sentence.
//!
//! The card's term is searched for as a whole word, ignoring case. Every
//! occurrence is replaced with [`BLANK`] and the first occurrence, with the
//! casing it has in the sentence, becomes the expected answer.
//!
//! When the term does not occur as a whole word (multi-word phrases that are
//! inflected differently, or terms that start or end with punctuation such as
//! `"¿Dónde está?"`), the sentence is shown unchanged and the term itself is
//! the answer.
//!
//! # Example
//!
//! ```
//! use drillkit_engine::Card;
//! use drillkit_engine::cloze::{self, BLANK};
//!
//! let card = Card::new(1, "Hola", "Hello", "¡Hola! ¿Cómo estás?");
//! let cloze = cloze::generate(&card);
//!
//! assert_eq!(cloze.prompt, format!("¡{}! ¿Cómo estás?", BLANK));
//! assert_eq!(cloze.answer, "Hola");
//! assert!(cloze.blanked);
//! ```

use drillkit::Card;
use regex::{NoExpand, RegexBuilder};
use tracing::debug;

/// Marker substituted for the hidden term.
pub const BLANK: &str = "______";

/// A generated cloze question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cloze {
    /// The sentence with the term blanked out (or unchanged on fallback).
    pub prompt: String,
    /// The text the learner is expected to type.
    pub answer: String,
    /// Whether a blank was actually inserted.
    pub blanked: bool,
}

/// Generate a cloze question for a card.
pub fn generate(card: &Card) -> Cloze {
    blank_out(&card.usage, &card.term).unwrap_or_else(|| {
        debug!(key = card.key, term = %card.term, "Term not found in usage, showing sentence as-is");
        Cloze {
            prompt: card.usage.clone(),
            answer: card.term.clone(),
            blanked: false,
        }
    })
}

/// Replace every whole-word, case-insensitive occurrence of `term` in
/// `sentence`. Returns `None` when there is no such occurrence.
fn blank_out(sentence: &str, term: &str) -> Option<Cloze> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term)))
        .case_insensitive(true)
        .build()
        .ok()?;

    let first = pattern.find(sentence)?;
    Some(Cloze {
        prompt: pattern.replace_all(sentence, NoExpand(BLANK)).into_owned(),
        answer: first.as_str().to_string(),
        blanked: true,
    })
}
