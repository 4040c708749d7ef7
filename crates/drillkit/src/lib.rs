//! Async client and card types for the drillkit vocabulary webhook.
//!
//! The webhook is the remote side of a drill session: it serves the deck of
//! word cards and accepts batches of mastery updates. This crate provides the
//! wire types shared with the session engine and a thin async client over the
//! two endpoints.
//!
//! # Quick Start
//!
//! ```no_run
//! use drillkit::DrillClient;
//!
//! # async fn example() -> drillkit::Result<()> {
//! let client = DrillClient::builder()
//!     .url("https://example.com/webhook/vocabulary/spanish")
//!     .credentials("learner", "secret")
//!     .build();
//!
//! let cards = client.cards().list().await?;
//! println!("Loaded {} cards", cards.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Endpoints
//!
//! - [`DrillClient::cards()`] - Fetch the full deck (`GET {url}`)
//! - [`DrillClient::mastery()`] - Push mastery updates (`POST {url}/update`)

pub mod actions;
pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, DrillClient};
pub use error::{Error, Result};
pub use types::{Card, CardKey, CardUpdate, Difficulty, MasteryUpdate};
