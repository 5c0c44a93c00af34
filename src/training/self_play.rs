//! Self-play loop: every seat is played by the same brain.

use crate::ai::Planner;
use crate::core::{GameState, PlayerId};
use crate::error::Result;
use crate::rules::{play_game, GameResult, RulesEngine};

use super::registry::BrainRegistry;

/// Configuration for self-play.
#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    /// Rounds after which an unfinished game is abandoned.
    pub max_rounds: u32,

    /// Seed offset combined with the game index for unique seeds.
    pub seed_offset: u64,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            max_rounds: 40,
            seed_offset: 0,
        }
    }
}

impl SelfPlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }
}

/// Summary of one self-play game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameRecord {
    pub seed: u64,
    pub rounds: u32,
    /// `None` if the round cap was hit.
    pub result: Option<GameResult>,
    pub scores: Vec<i32>,
}

pub struct SelfPlayWorker<'a, R: ?Sized> {
    rules: &'a R,
    config: SelfPlayConfig,
}

impl<'a, R: RulesEngine + ?Sized> SelfPlayWorker<'a, R> {
    pub fn new(rules: &'a R, config: SelfPlayConfig) -> Self {
        Self { rules, config }
    }

    /// Play `state` to the end and train on the result.
    pub fn play_game(&self, state: &mut GameState, seed: u64, registry: &mut BrainRegistry) -> Result<GameRecord> {
        let brain = registry.initialize(state.ruleset, state.shared_library());
        brain.begin_game();
        let result = {
            let mut planner = Planner::new(self.rules, brain);
            play_game(self.rules, state, &mut planner, self.config.max_rounds)?
        };

        if state.game_over {
            registry.notify_game_over(state)?;
        } else {
            log::warn!("game {seed} abandoned after {} rounds", state.round);
        }

        Ok(GameRecord {
            seed,
            rounds: state.round,
            result,
            scores: PlayerId::all(state.player_count())
                .map(|p| state.players[p].end_score)
                .collect(),
        })
    }

    /// Play `count` games built by `new_game(seed)`.
    pub fn play_games(
        &self,
        new_game: impl Fn(u64) -> GameState,
        count: usize,
        registry: &mut BrainRegistry,
    ) -> Result<Vec<GameRecord>> {
        (0..count as u64)
            .map(|i| {
                let seed = self.config.seed_offset.wrapping_add(i);
                let mut state = new_game(seed);
                self.play_game(&mut state, seed, registry)
            })
            .collect()
    }
}
