//! Core game data: seats, cards, ruleset shape, state and randomness.
//!
//! These types are shared by the rules engine and the decision engine. They
//! carry no game rules beyond pure inspection helpers.

pub mod card;
pub mod player;
pub mod rng;
pub mod ruleset;
pub mod state;

pub use card::{Card, CardDesign, CardIdx, CardKind, CardLibrary, ConsumeKind, ConsumePower, DesignId, GoodType, Location};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use ruleset::{Action, Phase, Ruleset, Selection};
pub use state::{CardList, GameState, Goal, GoalKind, Player, RoundRecord, GOAL_VP, TABLEAU_LIMIT, VP_PER_PLAYER};
