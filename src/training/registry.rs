//! One `Brain` per ruleset, created on demand and persisted at shutdown.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::config::AiConfig;
use crate::core::{CardLibrary, GameState, PlayerId, Ruleset};
use crate::error::Result;

use super::brain::Brain;
use super::stats::BrainStats;

pub struct BrainRegistry {
    config: AiConfig,
    brains: FxHashMap<Ruleset, Brain>,
    shut_down: bool,
}

impl BrainRegistry {
    pub fn new(config: AiConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            brains: FxHashMap::default(),
            shut_down: false,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// The brain for `ruleset`, loading or bootstrapping it on first use.
    pub fn initialize(&mut self, ruleset: Ruleset, library: Arc<CardLibrary>) -> &mut Brain {
        let config = &self.config;
        self.shut_down = false;
        self.brains.entry(ruleset).or_insert_with(|| {
            log::info!("{:<32}{:<32}", "initializing brain", ruleset.stem());
            let mut brain = Brain::bootstrap(ruleset, library, config);
            brain.load_or_bootstrap(config.weights_dir.as_deref());
            brain
        })
    }

    #[must_use]
    pub fn brain(&self, ruleset: Ruleset) -> Option<&Brain> {
        self.brains.get(&ruleset)
    }

    pub fn brain_mut(&mut self, ruleset: Ruleset) -> Option<&mut Brain> {
        self.brains.get_mut(&ruleset)
    }

    /// Final training for every seat of a finished game.
    pub fn notify_game_over(&mut self, state: &GameState) -> Result<()> {
        let brain = self.initialize(state.ruleset, state.shared_library());
        for player in PlayerId::all(state.player_count()) {
            brain.notify_game_over(state, player)?;
        }
        brain.finish_game();
        Ok(())
    }

    #[must_use]
    pub fn stats(&self) -> Vec<BrainStats> {
        let mut stats: Vec<_> = self.brains.values().map(Brain::stats).collect();
        stats.sort_by(|a, b| a.ruleset.cmp(&b.ruleset));
        stats
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Log counters and write every network. Calling it again without new
    /// activity does nothing.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Ok(());
        }
        for stats in self.stats() {
            log::info!("{stats}");
        }
        if let Some(dir) = &self.config.weights_dir {
            for brain in self.brains.values() {
                brain.save(dir)?;
            }
        }
        self.shut_down = true;
        Ok(())
    }
}
