//! Networks, cache and logs for one ruleset.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::ai::{ChoiceLog, ChoiceRecord, PredictModel};
use crate::config::AiConfig;
use crate::core::{CardLibrary, GameState, PlayerId, Ruleset};
use crate::error::{Error, Result};
use crate::nn::{Encoder, NetShape, Network};
use crate::rules::RulesEngine;
use crate::search::{evaluate, EvalCache, ValueModel};

use super::stats::BrainStats;
use super::trainer::{outcome_target, perform_training};

/// Everything the planner needs to play one ruleset.
pub struct Brain {
    ruleset: Ruleset,
    config: AiConfig,
    pub(crate) value: ValueModel,
    pub(crate) predictor: PredictModel,
    pub(crate) cache: EvalCache,
    logs: Vec<ChoiceLog>,
    decisions: u64,
    games: u64,
    salt: u64,
}

impl Brain {
    /// Fresh networks with random weights.
    #[must_use]
    pub fn bootstrap(ruleset: Ruleset, library: Arc<CardLibrary>, config: &AiConfig) -> Self {
        let eval_encoder = Encoder::eval(Arc::clone(&library), ruleset);
        let eval_shape = NetShape::new(eval_encoder.inputs(), config.eval_hidden, eval_encoder.outputs());
        let eval_net = Network::build(eval_shape, eval_encoder.layout().id, config.learning_rate, config.seed)
            .with_sample_window(config.sample_window)
            .with_names(eval_encoder.layout().names.clone());

        let predict_encoder = Encoder::predictor(library, ruleset);
        let predict_shape = NetShape::new(
            predict_encoder.inputs(),
            config.predict_hidden,
            predict_encoder.outputs(),
        );
        let predict_net = Network::build(
            predict_shape,
            predict_encoder.layout().id,
            config.learning_rate,
            config.seed.wrapping_add(1),
        )
        .with_sample_window(0)
        .with_names(predict_encoder.layout().names.clone());

        Self {
            ruleset,
            config: config.clone(),
            value: ValueModel::new(eval_encoder, eval_net),
            predictor: PredictModel::new(predict_encoder, predict_net),
            cache: EvalCache::new(config.cache_buckets),
            logs: vec![ChoiceLog::default(); ruleset.player_count()],
            decisions: 0,
            games: 0,
            salt: 0,
        }
    }

    #[must_use]
    pub fn ruleset(&self) -> Ruleset {
        self.ruleset
    }

    #[must_use]
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    #[must_use]
    pub fn value_network(&self) -> &Network {
        &self.value.network
    }

    #[must_use]
    pub fn predictor_network(&self) -> &Network {
        &self.predictor.network
    }

    #[must_use]
    pub fn cache(&self) -> &EvalCache {
        &self.cache
    }

    #[must_use]
    pub fn choices(&self, player: PlayerId) -> &ChoiceLog {
        &self.logs[player.index()]
    }

    /// Forget the previous game's choice logs.
    pub fn begin_game(&mut self) {
        self.logs.iter_mut().for_each(ChoiceLog::clear);
    }

    /// Cached value of `state` for `viewpoint`.
    pub fn evaluate<R: RulesEngine + ?Sized>(&mut self, rules: &R, state: &GameState, viewpoint: PlayerId) -> Result<f64> {
        evaluate(rules, &mut self.value, &mut self.cache, state, viewpoint)
    }

    /// Seed for the next simulation stream.
    pub(crate) fn next_salt(&mut self) -> u64 {
        self.salt += 1;
        self.config.seed ^ self.salt.wrapping_mul(0x9e37_79b9_7f4a_7c15)
    }

    pub(crate) fn record_choice(&mut self, player: PlayerId, record: ChoiceRecord) {
        self.logs[player.index()].push(record);
    }

    /// Close a top-level decision: cached values are only valid within one.
    pub(crate) fn end_decision(&mut self) {
        self.decisions += 1;
        self.cache.clear();
    }

    /// Train `player`'s earlier positions toward the value of this one, then
    /// remember this one.
    pub fn observe(&mut self, state: &GameState, player: PlayerId) -> Result<()> {
        if !self.config.training {
            return Ok(());
        }
        let features = self.value.encoder.encode(state, player);
        self.value.network.set_inputs(&features)?;
        let target = self.value.network.forward().to_vec();
        self.value.forwards += 1;

        let trained = perform_training(&mut self.value.network, player, &target, self.config.lambda_decay)?;
        if trained > 0 {
            self.cache.clear();
        }
        self.value.network.set_inputs(&features)?;
        self.value.network.store_sample(player);
        Ok(())
    }

    /// Train `player`'s stored positions toward the final result.
    pub fn notify_game_over(&mut self, state: &GameState, player: PlayerId) -> Result<()> {
        if !self.config.training {
            return Ok(());
        }
        let features = self.value.encoder.encode(state, player);
        self.value.network.set_inputs(&features)?;
        self.value.network.store_sample(player);

        let target = outcome_target(state, player);
        let trained = perform_training(&mut self.value.network, player, &target, self.config.lambda_decay)?;
        log::debug!("{player} final training on {trained} samples toward {target:?}");
        self.value.network.drop_samples_of(player);
        self.cache.clear();
        Ok(())
    }

    pub(crate) fn finish_game(&mut self) {
        self.games += 1;
    }

    #[must_use]
    pub fn stats(&self) -> BrainStats {
        BrainStats {
            ruleset: self.ruleset.stem(),
            games: self.games,
            decisions: self.decisions,
            evaluations: self.value.forwards,
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
            eval_iterations: self.value.network.iterations(),
            predict_iterations: self.predictor.network.iterations(),
            predictions: self.predictor.diagnostics,
        }
    }

    // === Persistence ===

    fn paths(&self, dir: &Path) -> (PathBuf, PathBuf) {
        let stem = self.ruleset.stem();
        (dir.join(format!("eval.{stem}.net")), dir.join(format!("role.{stem}.net")))
    }

    /// Load both networks from `dir` (when given), keeping fresh weights for
    /// any network whose file is missing or does not match. A value network
    /// left fresh is pretrained if configured.
    pub fn load_or_bootstrap(&mut self, dir: Option<&Path>) {
        let eval_loaded = match dir {
            Some(dir) => {
                let (eval_path, role_path) = self.paths(dir);
                load_network(&mut self.predictor.network, &role_path);
                load_network(&mut self.value.network, &eval_path)
            }
            None => false,
        };

        if !eval_loaded && self.config.pretrain_iterations > 0 {
            log::info!(
                "{:<32}{:<32}",
                "pretraining value network",
                self.config.pretrain_iterations
            );
            self.value
                .network
                .pretrain(self.config.pretrain_iterations, self.config.seed);
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let (eval_path, role_path) = self.paths(dir);
        self.value.network.save(&eval_path)?;
        self.predictor.network.save(&role_path)
    }
}

/// Returns whether the file was loaded.
fn load_network(network: &mut Network, path: &Path) -> bool {
    match network.load(path) {
        Ok(()) => true,
        Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            log::info!("{:<32}{:<32}", "bootstrapping network", path.display());
            false
        }
        Err(e) => {
            log::warn!("discarding {}: {e}; bootstrapping", path.display());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::galaxy;

    fn config() -> AiConfig {
        AiConfig::default().with_hidden(8, 8).with_learning_rate(0.05)
    }

    #[test]
    fn test_bootstrap_shapes_follow_ruleset() {
        let (_, state) = galaxy::new_game(galaxy::Options::new(3).with_expansion(1), 1);
        let brain = Brain::bootstrap(state.ruleset, state.shared_library(), &config());
        assert_eq!(brain.value_network().shape().outputs, 3);
        assert_eq!(brain.predictor_network().shape().outputs, 7);
        assert_eq!(brain.value_network().names().len(), brain.value_network().shape().inputs);
    }

    #[test]
    fn test_observe_stores_samples() {
        let (_, state) = galaxy::new_game(galaxy::Options::new(2), 1);
        let mut brain = Brain::bootstrap(state.ruleset, state.shared_library(), &config());
        brain.observe(&state, PlayerId::new(0)).unwrap();
        brain.observe(&state, PlayerId::new(1)).unwrap();
        assert_eq!(brain.value_network().sample_count(), 2);
        // the second observation of seat 0 trains its first sample
        brain.observe(&state, PlayerId::new(0)).unwrap();
        assert_eq!(brain.value_network().iterations(), 1);
    }

    #[test]
    fn test_training_disabled_leaves_weights() {
        let (_, state) = galaxy::new_game(galaxy::Options::new(2), 1);
        let mut brain = Brain::bootstrap(state.ruleset, state.shared_library(), &config().with_training(false));
        brain.observe(&state, PlayerId::new(0)).unwrap();
        brain.observe(&state, PlayerId::new(0)).unwrap();
        assert_eq!(brain.value_network().iterations(), 0);
        assert_eq!(brain.value_network().sample_count(), 0);
    }

    #[test]
    fn test_missing_weights_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        let (_, state) = galaxy::new_game(galaxy::Options::new(2), 1);
        let mut brain = Brain::bootstrap(state.ruleset, state.shared_library(), &config());
        let before = brain.value_network().weights().0.to_vec();
        brain.load_or_bootstrap(Some(dir.path()));
        assert_eq!(brain.value_network().weights().0, before.as_slice());
    }
}
