//! Session engine for vocabulary drills.
//!
//! This crate holds everything between the card source and the learner:
//! building a [`Deck`], asking questions in one of four [`Mode`]s, scoring
//! answers, and deciding when mastery updates go back to the store. The
//! [`drillkit`] crate provides the wire types and the webhook client.
//!
//! # Quick Start
//!
//! ```no_run
//! use drillkit_engine::{Answer, Engine, Mode, Session};
//! use drillkit_engine::shuffle::ThreadShuffler;
//!
//! # async fn example() -> drillkit_engine::Result<()> {
//! let engine = Engine::new();
//! let deck = engine.load_deck().await?;
//! let queue = engine.flush_queue();
//!
//! let mut session = Session::new(Mode::Review, &deck, ThreadShuffler);
//! while let Some(question) = session.current_question() {
//!     println!("{}", question.prompt);
//!     session.submit(Answer::Recall(true));
//!     if let Some(batch) = session.advance().and_then(|a| a.flush) {
//!         queue.send(batch);
//!     }
//! }
//!
//! println!("Score: {}%", session.percentage());
//! queue.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`deck`] - Card collection, active learning set, deck files
//! - [`normalize`] - Answer normalization and matching
//! - [`cloze`] - Fill-in-the-blank prompts from usage sentences
//! - [`distractor`] - Wrong answers for multiple choice
//! - [`question`] - Modes and per-card questions
//! - [`session`] - The session state machine
//! - [`sync`] - Flush threshold and batches
//! - [`dispatch`] - Background delivery of batches
//! - [`shuffle`] - Randomness sources
//!
//! # Feature Flags
//!
//! - `files` (default) - Load decks from TOML files

mod error;

pub mod cloze;
pub mod deck;
pub mod dispatch;
pub mod distractor;
pub mod normalize;
pub mod question;
pub mod session;
pub mod shuffle;
pub mod sync;

pub use deck::{Deck, DeckStats};
pub use dispatch::{FlushQueue, FlushStats, MasterySink};
pub use error::{Error, Result};
pub use normalize::AnswerMatcher;
pub use question::{Mode, Question};
pub use session::{Answer, Grade, Session, Status, Summary, Verdict};
pub use sync::{FlushBatch, FlushReason, SyncPolicy};

// Re-export drillkit types for convenience
pub use drillkit::{Card, CardKey, CardUpdate, ClientBuilder, Difficulty, DrillClient, MasteryUpdate};

use tracing::info;

/// Entry point tying a webhook client to the session engine.
///
/// # Example
///
/// ```no_run
/// use drillkit_engine::Engine;
///
/// # async fn example() -> drillkit_engine::Result<()> {
/// let client = drillkit_engine::DrillClient::builder()
///     .url("https://example.com/webhook/vocabulary/spanish")
///     .credentials("learner", "secret")
///     .build();
/// let engine = Engine::from_client(client);
///
/// let deck = engine.load_deck().await?;
/// println!("{:?}", deck.stats());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    client: DrillClient,
}

impl Engine {
    /// Create an engine with default client settings.
    pub fn new() -> Self {
        Self {
            client: DrillClient::new(),
        }
    }

    /// Create an engine from an existing client.
    pub fn from_client(client: DrillClient) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client.
    pub fn client(&self) -> &DrillClient {
        &self.client
    }

    /// Fetch the full deck from the card source.
    ///
    /// Any transport or parse failure is reported as [`Error::Load`]; the
    /// caller should offer a retry rather than start a session.
    pub async fn load_deck(&self) -> Result<Deck> {
        let cards = self.client.cards().list().await.map_err(Error::Load)?;
        let deck = Deck::new(cards)?;
        info!(cards = deck.len(), "Deck loaded");
        Ok(deck)
    }

    /// Start a background queue that pushes batches through this engine's
    /// client. Must be called inside a Tokio runtime.
    pub fn flush_queue(&self) -> FlushQueue {
        FlushQueue::spawn(self.client.clone())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
