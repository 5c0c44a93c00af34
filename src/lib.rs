//! # galaxy-ai
//!
//! A search-and-learn decision engine for a card-drafting economy game with
//! hidden information and simultaneous action selection.
//!
//! ## Design Principles
//!
//! 1. **Rules Stay Outside**: The engine never interprets game rules. It
//!    drives hypothetical copies through the `RulesEngine` trait and scores
//!    the outcomes.
//!
//! 2. **N-Player First**: Features, outputs and predictions are laid out
//!    relative to a viewpoint seat, for two to six players.
//!
//! 3. **No Peeking**: Lookahead runs on copies where unknown cards are only
//!    counted, with a simulation RNG stream separate from the real one.
//!
//! ## Architecture
//!
//! - **Materialize and Score**: Every candidate reply is applied to a copy,
//!   the turn is completed with the same planner answering nested decisions,
//!   and the value network scores the result.
//!
//! - **Opponent Model**: A second network predicts each opponent's action
//!   selection; action search covers the likely combinations.
//!
//! - **Online Training**: Both networks learn from real decisions and final
//!   results, with weights persisted per ruleset.
//!
//! ## Modules
//!
//! - `core`: Seats, cards, ruleset shape, state and randomness
//! - `rules`: RulesEngine trait and the round driver
//! - `games`: Reference ruleset
//! - `nn`: Feed-forward networks and feature encoders
//! - `search`: Evaluation cache, subset search, hypothetical play
//! - `ai`: Decision requests and the planner
//! - `training`: Brains, the registry, TD training and self-play
//! - `config`: Tunables

pub mod ai;
pub mod config;
pub mod core;
pub mod error;
pub mod games;
pub mod nn;
pub mod rules;
pub mod search;
pub mod training;

// Re-export commonly used types
pub use crate::core::{
    Action, Card, CardDesign, CardIdx, CardLibrary, GameRng, GameState, Phase, PlayerId, PlayerMap, Ruleset,
    Selection,
};

pub use crate::ai::{Decider, DecisionKind, Planner, Reply, Request};

pub use crate::config::AiConfig;

pub use crate::error::{Error, Result};

pub use crate::nn::{Encoder, Network};

pub use crate::rules::{play_game, play_round, GameResult, RulesEngine};

pub use crate::search::{complete_turn, simulate, EvalCache, Granularity};

pub use crate::training::{Brain, BrainRegistry, BrainStats, SelfPlayConfig, SelfPlayWorker};
