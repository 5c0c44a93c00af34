//! Counters reported at shutdown.

use serde::{Deserialize, Serialize};

use crate::ai::PredictionStats;

/// Snapshot of one brain's activity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BrainStats {
    /// Ruleset stem, e.g. `2p.e1`.
    pub ruleset: String,
    pub games: u64,
    /// Top-level decisions made.
    pub decisions: u64,
    /// Value network forward passes.
    pub evaluations: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Committed training steps of the value network.
    pub eval_iterations: u64,
    /// Committed training steps of the predictor.
    pub predict_iterations: u64,
    pub predictions: PredictionStats,
}

impl BrainStats {
    #[must_use]
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

impl std::fmt::Display for BrainStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} games, {} decisions, {} evaluations, cache {:.1}%, predictor hits {:.1}% mse {:.4}",
            self.ruleset,
            self.games,
            self.decisions,
            self.evaluations,
            self.cache_hit_rate() * 100.0,
            self.predictions.hit_rate() * 100.0,
            self.predictions.mean_error(),
        )
    }
}
