//! A compact space-empire card game for driving the decision engine.
//!
//! Every round each seat secretly selects an action card (two in the
//! advanced two-player game). The phases any seat selected are resolved in
//! order, with a bonus for the seats that selected them:
//!
//! - **Explore**: draw two, keep one (more with the Explore actions)
//! - **Develop**: place a development and pay for it in cards
//! - **Settle**: place a world; military worlds are conquered by strength
//! - **Consume**: trade one good for cards, then use consume powers for VP
//! - **Produce**: production worlds receive a good
//!
//! Expansion 1 adds "first to" goals; expansion 2 adds prestige, prestige
//! search and takeovers of military worlds. The game ends at round end once
//! the VP pool is empty or a tableau reaches twelve cards.
//!
//! Phases resume from per-seat progress markers, so a hypothetical copy
//! taken in the middle of a phase can be completed from where it stands.

mod game;
mod library;

pub use game::{new_game, Galaxy, Options, SearchCategory, HAND_LIMIT, START_HAND};
pub use library::standard;
