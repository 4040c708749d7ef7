//! Error types for the drillkit crate.
//!
//! # Example
//!
//! ```no_run
//! use drillkit::{DrillClient, Error};
//!
//! # async fn example() {
//! let client = DrillClient::new();
//!
//! match client.cards().list().await {
//!     Ok(cards) => println!("Found {} cards", cards.len()),
//!     Err(Error::ConnectionRefused) => eprintln!("Is the webhook reachable?"),
//!     Err(Error::Status { status: 401, .. }) => eprintln!("Check your credentials"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```

use thiserror::Error;

/// The error type for webhook operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP/network error from reqwest.
    ///
    /// For connection issues, see [`Error::ConnectionRefused`].
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    ///
    /// Usually means the webhook returned records in an unexpected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The webhook host could not be reached.
    #[error("Could not connect to the vocabulary webhook")]
    ConnectionRefused,

    /// The webhook answered with a non-success status code.
    #[error("{action} failed with HTTP status {status}")]
    Status {
        /// The operation that was attempted.
        action: &'static str,
        /// The HTTP status code returned.
        status: u16,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A specialized Result type for webhook operations.
pub type Result<T> = std::result::Result<T, Error>;
