//! Network ownership, online training and persistence.
//!
//! ## Overview
//!
//! - **Brain**: the value network, action predictor, evaluation cache and
//!   choice logs for one ruleset
//! - **BrainRegistry**: brains keyed by ruleset; `initialize`,
//!   `notify_game_over` and an idempotent `shutdown` that writes weights
//! - **Trainer**: temporal-difference updates over stored samples
//! - **SelfPlayWorker**: plays whole games with every seat on one brain
//!
//! ## Usage
//!
//! ```rust,ignore
//! use galaxy_ai::config::AiConfig;
//! use galaxy_ai::games::galaxy;
//! use galaxy_ai::training::{BrainRegistry, SelfPlayConfig, SelfPlayWorker};
//!
//! let mut registry = BrainRegistry::new(AiConfig::default().with_weights_dir("nets"))?;
//! let (rules, mut state) = galaxy::new_game(galaxy::Options::new(2), 7);
//! let worker = SelfPlayWorker::new(&rules, SelfPlayConfig::default());
//! let record = worker.play_game(&mut state, 7, &mut registry)?;
//! registry.shutdown()?;
//! ```

pub mod brain;
pub mod registry;
pub mod self_play;
pub mod stats;
pub mod trainer;

pub use brain::Brain;
pub use registry::BrainRegistry;
pub use self_play::{GameRecord, SelfPlayConfig, SelfPlayWorker};
pub use stats::BrainStats;
pub use trainer::{outcome_target, perform_training};
