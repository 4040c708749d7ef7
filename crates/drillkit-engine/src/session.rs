//! Live progress of one assessment run.
//!
//! A session walks a shuffled working order. At each position the learner
//! submits one answer, which reveals the verdict and locks the question, then
//! advances. Advancing past the last card completes the session.
//!
//! ```text
//! Active(p, s) --submit--> Active(p, s') revealed --advance--> Active(p+1, s')
//!                                                  \--------> Complete
//! ```
//!
//! Submitting twice, advancing before submitting, or doing anything other
//! than resetting a complete session is a no-op.
//!
//! # Example
//!
//! ```
//! use drillkit_engine::{Answer, Card, Deck, Mode, Session};
//! use drillkit_engine::shuffle::NoShuffle;
//!
//! let deck = Deck::new(vec![
//!     Card::new(1, "Hola", "Hello", "¡Hola! ¿Cómo estás?"),
//!     Card::new(2, "Gracias", "Thank you", "Muchas gracias."),
//! ])
//! .unwrap();
//!
//! let mut session = Session::new(Mode::Typing, &deck, NoShuffle);
//! assert_eq!(session.current_question().unwrap().prompt, "Hello");
//!
//! let verdict = session.submit(Answer::Typed("¡hola!".into())).unwrap();
//! assert!(verdict.correct);
//!
//! session.advance().unwrap();
//! session.submit(Answer::Typed("de nada".into())).unwrap();
//! session.advance().unwrap();
//!
//! assert!(session.is_complete());
//! assert_eq!(session.percentage(), 50);
//! ```

use std::collections::BTreeSet;

use drillkit::{Card, CardKey, CardUpdate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::deck::Deck;
use crate::normalize::AnswerMatcher;
use crate::question::{Mode, Question};
use crate::shuffle::{Shuffler, ThreadShuffler};
use crate::sync::{FlushBatch, SyncPolicy};

/// A learner's response to the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Flip-card self-assessment: `true` for "I know this".
    Recall(bool),
    /// The option text picked in a multiple-choice question.
    Choice(String),
    /// A typed response for cloze or typing questions.
    Typed(String),
}

/// The outcome of a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// The card that was asked about.
    pub card_key: CardKey,
    /// Whether the answer was accepted.
    pub correct: bool,
    /// The accepted answer, for display.
    pub expected: String,
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Asking the card at `position`.
    Active {
        /// Zero-based index into the working order.
        position: usize,
    },
    /// Every card has been answered.
    Complete,
}

/// Result of a successful [`Session::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// The status after advancing.
    pub status: Status,
    /// A batch to hand to the mastery sink, if one is due.
    pub flush: Option<FlushBatch>,
}

/// Mutable per-session counters and outcome sets.
///
/// Only the session and its [`SyncPolicy`] change this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) position: usize,
    pub(crate) score: usize,
    pub(crate) correct: BTreeSet<CardKey>,
    pub(crate) incorrect: BTreeSet<CardKey>,
    pub(crate) reviews_since_flush: u32,
    pub(crate) pending: Vec<CardUpdate>,
    pub(crate) revealed: Option<Verdict>,
    pub(crate) complete: bool,
}

impl SessionState {
    /// Zero-based position in the working order.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of correct answers so far.
    pub fn score(&self) -> usize {
        self.score
    }

    /// Keys answered correctly (or marked known) this session.
    pub fn correct(&self) -> &BTreeSet<CardKey> {
        &self.correct
    }

    /// Keys answered incorrectly (or marked still learning) this session.
    pub fn incorrect(&self) -> &BTreeSet<CardKey> {
        &self.incorrect
    }

    /// Reviews counted since the last flush.
    pub fn reviews_since_flush(&self) -> u32 {
        self.reviews_since_flush
    }

    /// Updates waiting for the next flush.
    pub fn pending(&self) -> &[CardUpdate] {
        &self.pending
    }

    /// The verdict for the current question, once submitted.
    pub fn revealed(&self) -> Option<&Verdict> {
        self.revealed.as_ref()
    }

    /// Whether the session reached its terminal state.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Feedback band for a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// 80% or more.
    Excellent,
    /// 50% or more.
    Good,
    /// Below 50%.
    KeepPracticing,
}

impl Grade {
    /// Band for a percentage.
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= 80 {
            Grade::Excellent
        } else if percentage >= 50 {
            Grade::Good
        } else {
            Grade::KeepPracticing
        }
    }

    /// Message shown on the results screen.
    pub fn message(&self) -> &'static str {
        match self {
            Grade::Excellent => "Amazing work! You're mastering it!",
            Grade::Good => "Good effort! Keep practicing to improve.",
            Grade::KeepPracticing => "Keep learning! Practice makes perfect.",
        }
    }
}

/// End-of-session report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Mode of the session.
    pub mode: Mode,
    /// Correct answers.
    pub score: usize,
    /// Cards in the working order.
    pub total: usize,
    /// `round(100 * score / total)`, 0 for an empty session.
    pub percentage: u32,
    /// Keys answered correctly.
    pub correct: Vec<CardKey>,
    /// Keys answered incorrectly.
    pub incorrect: Vec<CardKey>,
    /// Feedback band.
    pub grade: Grade,
}

/// `round(100 * part / total)` with halves rounded up; 0 when `total` is 0.
///
/// ```
/// use drillkit_engine::session::percentage;
///
/// assert_eq!(percentage(1, 8), 13);
/// assert_eq!(percentage(2, 3), 67);
/// assert_eq!(percentage(0, 0), 0);
/// ```
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u64;
    let total = total as u64;
    ((200 * part + total) / (2 * total)) as u32
}

/// One assessment run over a deck.
#[derive(Debug)]
pub struct Session<S = ThreadShuffler> {
    mode: Mode,
    order: Vec<Card>,
    pool: Vec<Card>,
    shuffler: S,
    policy: SyncPolicy,
    matcher: AnswerMatcher,
    state: SessionState,
    question: Option<Question>,
}

impl<S: Shuffler> Session<S> {
    /// Start a session over `deck`, which also supplies the distractors.
    pub fn new(mode: Mode, deck: &Deck, shuffler: S) -> Self {
        Self::with_pool(mode, deck, deck.cards(), shuffler)
    }

    /// Start a session over `deck`, drawing distractors from `pool`.
    ///
    /// Useful when drilling the active learning set while still offering
    /// glosses from the whole deck as wrong answers. The pool is also the
    /// deck a review reset overwrites.
    pub fn with_pool(mode: Mode, deck: &Deck, pool: &[Card], mut shuffler: S) -> Self {
        let order = deck.shuffled_order(&mut shuffler);
        debug!(mode = %mode, cards = order.len(), "Starting session");

        let mut session = Self {
            mode,
            order,
            pool: pool.to_vec(),
            shuffler,
            policy: SyncPolicy::default(),
            matcher: AnswerMatcher::default(),
            state: SessionState::default(),
            question: None,
        };
        session.begin();
        session
    }

    /// Replace the sync policy.
    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the typed-answer matcher.
    pub fn with_matcher(mut self, matcher: AnswerMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// The session's mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The working order, fixed for the life of the session.
    pub fn order(&self) -> &[Card] {
        &self.order
    }

    /// Counters and outcome sets.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The active sync policy.
    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// Current status.
    pub fn status(&self) -> Status {
        if self.state.complete {
            Status::Complete
        } else {
            Status::Active {
                position: self.state.position,
            }
        }
    }

    /// Whether every card has been answered.
    pub fn is_complete(&self) -> bool {
        self.state.complete
    }

    /// The card at the current position.
    pub fn current_card(&self) -> Option<&Card> {
        if self.state.complete {
            return None;
        }
        self.order.get(self.state.position)
    }

    /// The question for the current position.
    pub fn current_question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    /// Cards in the working order.
    pub fn total(&self) -> usize {
        self.order.len()
    }

    /// Correct answers so far.
    pub fn score(&self) -> usize {
        self.state.score
    }

    /// `round(100 * score / total)`, 0 for an empty deck.
    pub fn percentage(&self) -> u32 {
        percentage(self.state.score, self.order.len())
    }

    /// Share of the deck reached, counting the current card.
    pub fn progress_percent(&self) -> u32 {
        if self.state.complete {
            return if self.order.is_empty() { 0 } else { 100 };
        }
        percentage(self.state.position + 1, self.order.len())
    }

    /// Answer the current question.
    ///
    /// Returns `None` without changing anything when the session is complete,
    /// the question was already answered, or the answer kind does not fit the
    /// mode.
    pub fn submit(&mut self, answer: Answer) -> Option<Verdict> {
        if self.state.complete || self.state.revealed.is_some() {
            debug!("Ignoring submit: question already answered or session complete");
            return None;
        }

        let question = self.question.as_ref()?;
        let card = self.order.get(self.state.position)?;

        let correct = match (self.mode, &answer) {
            (Mode::Review, Answer::Recall(knew)) => *knew,
            (Mode::MultipleChoice, Answer::Choice(choice)) => *choice == card.gloss,
            (Mode::Cloze | Mode::Typing, Answer::Typed(text)) => {
                self.matcher.matches(text, &question.answer)
            }
            _ => {
                warn!(mode = %self.mode, ?answer, "Answer does not fit the session mode");
                return None;
            }
        };

        let key = card.key;
        let update = if self.mode.persists_known_flag() {
            CardUpdate::known(key, correct)
        } else {
            let learned = card.times_learned.unwrap_or(0);
            CardUpdate::times_learned(key, if correct { learned.saturating_add(1) } else { learned })
        };
        let verdict = Verdict {
            card_key: key,
            correct,
            expected: question.answer.clone(),
        };

        if correct {
            self.state.score += 1;
            self.state.incorrect.remove(&key);
            self.state.correct.insert(key);
        } else {
            self.state.correct.remove(&key);
            self.state.incorrect.insert(key);
        }
        self.policy.record(&mut self.state, update);
        self.state.revealed = Some(verdict.clone());

        debug!(key, correct, "Answer recorded");
        Some(verdict)
    }

    /// Move to the next card, or complete the session after the last one.
    ///
    /// Returns `None` if the current question has not been answered yet.
    pub fn advance(&mut self) -> Option<Advance> {
        if self.state.complete || self.state.revealed.is_none() {
            debug!("Ignoring advance: nothing submitted");
            return None;
        }

        self.state.revealed = None;
        let mut flush = self.policy.on_review(&mut self.state);

        let next = self.state.position + 1;
        if next < self.order.len() {
            self.state.position = next;
            self.question = Some(self.build_question(next));
        } else {
            self.state.position = self.order.len();
            self.state.complete = true;
            self.question = None;
            if flush.is_none() {
                flush = self.policy.on_complete(&mut self.state);
            }
            info!(
                mode = %self.mode,
                score = self.state.score,
                total = self.order.len(),
                "Session complete"
            );
        }

        Some(Advance {
            status: self.status(),
            flush,
        })
    }

    /// Start over with the same working order.
    ///
    /// Outcome sets and counters are cleared and pending updates dropped. In
    /// [`Mode::Review`] this returns an unconditional batch marking every card
    /// of the pool (the full deck) as not known, including cards left out of
    /// the working order.
    pub fn reset(&mut self) -> Option<FlushBatch> {
        let batch = self
            .mode
            .persists_known_flag()
            .then(|| self.policy.reset_batch(self.pool.iter().map(|c| c.key)))
            .filter(|b| !b.is_empty());

        info!(mode = %self.mode, "Session reset");
        self.begin();
        batch
    }

    /// End-of-session report. Meaningful at any point.
    pub fn summary(&self) -> Summary {
        let percentage = self.percentage();
        Summary {
            mode: self.mode,
            score: self.state.score,
            total: self.order.len(),
            percentage,
            correct: self.state.correct.iter().copied().collect(),
            incorrect: self.state.incorrect.iter().copied().collect(),
            grade: Grade::from_percentage(percentage),
        }
    }

    fn begin(&mut self) {
        self.state = SessionState::default();
        if self.order.is_empty() {
            self.state.complete = true;
            self.question = None;
        } else {
            self.question = Some(self.build_question(0));
        }
    }

    fn build_question(&mut self, position: usize) -> Question {
        Question::for_card(self.mode, &self.order[position], &self.pool, &mut self.shuffler)
    }
}
