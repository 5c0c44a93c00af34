//! Search primitives shared by every decision handler.
//!
//! - `cache`: evaluation cache keyed by observable state
//! - `subset`: include/exclude subset enumeration
//! - `simulate`: hypothetical copies and turn completion
//! - `eval`: cached, nudged win-probability evaluation

pub mod cache;
pub mod eval;
pub mod simulate;
pub mod subset;

pub use cache::{EvalCache, StateKey};
pub use eval::{evaluate, ValueModel};
pub use simulate::{complete_turn, simulate, Granularity};
pub use subset::{best_subset, best_subset_in, best_with_specials, PairedOutcome, SubsetOutcome};
