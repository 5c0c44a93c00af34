//! Decision engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunables for search, training and persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Directory holding `eval.<ruleset>.net` / `role.<ruleset>.net`.
    /// `None` disables persistence.
    pub weights_dir: Option<PathBuf>,

    /// Hidden nodes in the value network.
    pub eval_hidden: usize,

    /// Hidden nodes in the action predictor.
    pub predict_hidden: usize,

    /// Gradient step size.
    pub learning_rate: f64,

    /// Weight multiplier applied to each older stored sample.
    pub lambda_decay: f64,

    /// Past input vectors remembered per network.
    pub sample_window: usize,

    /// Bucket count of the evaluation cache.
    pub cache_buckets: usize,

    /// Probability mass of opponent actions to cover before stopping.
    pub coverage: f64,

    /// Floor for the halving coverage threshold.
    pub min_threshold: f64,

    /// Softmax temperature turning action scores into a predictor target.
    pub action_temperature: f64,

    /// Candidate lists longer than this are pruned greedily before subset
    /// search.
    pub max_subset_items: usize,

    /// Nesting of hypothetical searches before decisions are scored
    /// without completing the turn.
    pub search_depth: u32,

    /// Score differences below this are treated as ties.
    pub epsilon: f64,

    /// Train networks online.
    pub training: bool,

    /// Synthetic pretraining passes for a freshly built value network.
    pub pretrain_iterations: usize,

    /// Seed for weight initialization and simulation streams.
    pub seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            weights_dir: None,
            eval_hidden: 50,
            predict_hidden: 50,
            learning_rate: 0.0005,
            lambda_decay: 0.7,
            sample_window: 32,
            cache_buckets: 1 << 14,
            coverage: 0.8,
            min_threshold: 1.0 / 1024.0,
            action_temperature: 0.05,
            max_subset_items: 10,
            search_depth: 1,
            epsilon: 1e-7,
            training: true,
            pretrain_iterations: 0,
            seed: 42,
        }
    }
}

impl AiConfig {
    pub fn with_weights_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.weights_dir = Some(dir.into());
        self
    }

    pub fn with_hidden(mut self, eval: usize, predict: usize) -> Self {
        self.eval_hidden = eval;
        self.predict_hidden = predict;
        self
    }

    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    pub fn with_training(mut self, training: bool) -> Self {
        self.training = training;
        self
    }

    pub fn with_search_depth(mut self, depth: u32) -> Self {
        self.search_depth = depth;
        self
    }

    pub fn with_pretraining(mut self, iterations: usize) -> Self {
        self.pretrain_iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Read a JSON config file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.eval_hidden == 0 || self.predict_hidden == 0 {
            return Err(Error::InvalidConfig("hidden layer size must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.coverage) || self.coverage == 0.0 {
            return Err(Error::InvalidConfig(format!("coverage {} outside (0, 1]", self.coverage)));
        }
        if self.min_threshold <= 0.0 {
            return Err(Error::InvalidConfig("min_threshold must be positive".into()));
        }
        if self.sample_window == 0 {
            return Err(Error::InvalidConfig("sample_window must be positive".into()));
        }
        if self.cache_buckets == 0 {
            return Err(Error::InvalidConfig("cache_buckets must be positive".into()));
        }
        if self.action_temperature <= 0.0 {
            return Err(Error::InvalidConfig("action_temperature must be positive".into()));
        }
        if self.max_subset_items == 0 {
            return Err(Error::InvalidConfig("max_subset_items must be positive".into()));
        }
        Ok(())
    }
}
