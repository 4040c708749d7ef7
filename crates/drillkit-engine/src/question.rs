//! Assessment modes and the questions they ask.

use std::fmt;
use std::str::FromStr;

use drillkit::{Card, CardKey};
use serde::Serialize;

use crate::cloze;
use crate::distractor::{self, DISTRACTOR_COUNT};
use crate::shuffle::Shuffler;

/// How a card is assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Flip-card review: the learner says whether they knew the gloss.
    Review,
    /// Pick the gloss among distractors.
    MultipleChoice,
    /// Type the word missing from the example sentence.
    Cloze,
    /// See the gloss, type the term.
    Typing,
}

impl Mode {
    /// Whether outcomes are persisted as the boolean "known" flag.
    ///
    /// Quiz modes persist the "times learned" counter instead.
    pub fn persists_known_flag(&self) -> bool {
        matches!(self, Mode::Review)
    }

    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Review => "review",
            Mode::MultipleChoice => "multiple-choice",
            Mode::Cloze => "cloze",
            Mode::Typing => "typing",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "review" | "flip" => Ok(Mode::Review),
            "multiple-choice" | "choice" | "mc" => Ok(Mode::MultipleChoice),
            "cloze" => Ok(Mode::Cloze),
            "typing" | "type" => Ok(Mode::Typing),
            _ => Err(format!("unknown mode: {}", s)),
        }
    }
}

/// One question, derived from the current card.
///
/// Built once per position; the option order does not change on re-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// The card being asked about.
    pub card_key: CardKey,
    /// The mode that produced this question.
    pub mode: Mode,
    /// What the learner is shown.
    pub prompt: String,
    /// The accepted answer.
    pub answer: String,
    /// Extra context shown with the prompt (the gloss for cloze questions).
    pub hint: Option<String>,
    /// Answer options, in presentation order. Empty outside multiple choice.
    pub options: Vec<String>,
}

impl Question {
    /// Build the question for `card`, drawing distractors from `pool`.
    pub fn for_card<S: Shuffler>(mode: Mode, card: &Card, pool: &[Card], shuffler: &mut S) -> Self {
        let mut question = Question {
            card_key: card.key,
            mode,
            prompt: card.term.clone(),
            answer: card.gloss.clone(),
            hint: None,
            options: Vec::new(),
        };

        match mode {
            Mode::Review => {}
            Mode::MultipleChoice => {
                question.options = distractor::options(card, pool, DISTRACTOR_COUNT, shuffler);
            }
            Mode::Cloze => {
                let cloze = cloze::generate(card);
                question.prompt = cloze.prompt;
                question.answer = cloze.answer;
                question.hint = Some(card.gloss.clone());
            }
            Mode::Typing => {
                question.prompt = card.gloss.clone();
                question.answer = card.term.clone();
            }
        }

        question
    }

    /// The option at `index`, if any.
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::NoShuffle;

    fn pool() -> Vec<Card> {
        vec![
            Card::new(1, "Hola", "Hello", "¡Hola! ¿Cómo estás?"),
            Card::new(2, "Gracias", "Thank you", "Muchas gracias."),
            Card::new(3, "Adiós", "Goodbye", "Adiós, amigo."),
            Card::new(4, "Por favor", "Please", "Ayúdame, por favor."),
        ]
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("review".parse::<Mode>(), Ok(Mode::Review));
        assert_eq!("Multiple-Choice".parse::<Mode>(), Ok(Mode::MultipleChoice));
        assert_eq!("mc".parse::<Mode>(), Ok(Mode::MultipleChoice));
        assert_eq!("cloze".parse::<Mode>(), Ok(Mode::Cloze));
        assert_eq!("typing".parse::<Mode>(), Ok(Mode::Typing));
        assert!("spelling".parse::<Mode>().is_err());
        assert_eq!(Mode::MultipleChoice.to_string(), "multiple-choice");
    }

    #[test]
    fn test_review_question() {
        let cards = pool();
        let q = Question::for_card(Mode::Review, &cards[0], &cards, &mut NoShuffle);
        assert_eq!(q.prompt, "Hola");
        assert_eq!(q.answer, "Hello");
        assert!(q.options.is_empty());
    }

    #[test]
    fn test_multiple_choice_question() {
        let cards = pool();
        let q = Question::for_card(Mode::MultipleChoice, &cards[0], &cards, &mut NoShuffle);
        assert_eq!(q.prompt, "Hola");
        assert_eq!(q.options, vec!["Thank you", "Goodbye", "Please", "Hello"]);
        assert_eq!(q.option(3), Some("Hello"));
        assert_eq!(q.option(4), None);
    }

    #[test]
    fn test_cloze_question() {
        let cards = pool();
        let q = Question::for_card(Mode::Cloze, &cards[3], &cards, &mut NoShuffle);
        assert_eq!(q.prompt, "Ayúdame, ______.");
        assert_eq!(q.answer, "por favor");
        assert_eq!(q.hint.as_deref(), Some("Please"));
    }

    #[test]
    fn test_typing_question() {
        let cards = pool();
        let q = Question::for_card(Mode::Typing, &cards[2], &cards, &mut NoShuffle);
        assert_eq!(q.prompt, "Goodbye");
        assert_eq!(q.answer, "Adiós");
    }

    #[test]
    fn test_known_flag_modes() {
        assert!(Mode::Review.persists_known_flag());
        assert!(!Mode::MultipleChoice.persists_known_flag());
        assert!(!Mode::Cloze.persists_known_flag());
        assert!(!Mode::Typing.persists_known_flag());
    }
}
