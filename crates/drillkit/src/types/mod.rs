//! Domain types shared with the session engine.
//!
//! Field names follow the webhook's JSON records (`row_number`, `spanish`,
//! `english`, ...) while the Rust names describe their role.

mod card;
mod mastery;

pub use card::{Card, CardKey, Difficulty};
pub use mastery::{CardUpdate, MasteryUpdate};
