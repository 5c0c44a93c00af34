//! Rules engine interface.
//!
//! Games implement `RulesEngine`; the decision engine drives hypothetical
//! copies through it and never interprets game concepts directly.

pub mod engine;

pub use engine::{play_game, play_round, GameResult, RulesEngine};
