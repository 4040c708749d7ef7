//! Action modules for webhook operations.

mod cards;
mod mastery;

pub use cards::CardActions;
pub use mastery::MasteryActions;
