//! The decision engine.
//!
//! Rules engines ask for choices through the `Decider` trait. `Planner`
//! answers them by searching hypothetical continuations and scoring them
//! with a `Brain`'s networks.

mod handlers;
pub mod choices;
pub mod planner;
pub mod predict;
pub mod request;

pub use choices::{ChoiceLog, ChoiceRecord};
pub use planner::{Planner, MAX_CANDIDATES};
pub use predict::{covering_combos, softmax_target, Combo, PredictModel, PredictionStats};
pub use request::{Decider, DecisionKind, Reply, Request};
