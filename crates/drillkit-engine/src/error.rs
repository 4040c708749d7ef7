//! Error types for drillkit-engine.
//!
//! Session operations never fail: degenerate input degrades to fewer options
//! or a zero percentage, and sink failures are only logged. Errors are raised
//! where a deck is obtained, because a session must not start without one.
//!
//! # Example
//!
//! ```no_run
//! use drillkit_engine::{Engine, Error};
//!
//! # async fn example() {
//! let engine = Engine::new();
//!
//! match engine.load_deck().await {
//!     Ok(deck) => println!("{} cards", deck.len()),
//!     Err(Error::Load(e)) => eprintln!("Could not load the deck, try again: {}", e),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```

use drillkit::CardKey;
use thiserror::Error;

/// Result type for drillkit-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying webhook client.
    #[error(transparent)]
    Client(#[from] drillkit::Error),

    /// The deck could not be fetched from the card source.
    #[error("failed to load deck: {0}")]
    Load(#[source] drillkit::Error),

    /// Two cards share the same identity key.
    #[error("duplicate card key: {0}")]
    DuplicateKey(CardKey),

    /// The mastery sink rejected a batch.
    #[error("mastery sink error: {0}")]
    Sink(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A deck file was not valid TOML.
    #[cfg(feature = "files")]
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A deck file was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A deck file has an extension we cannot read.
    #[error("unsupported deck file: {0}")]
    UnsupportedFormat(String),
}
