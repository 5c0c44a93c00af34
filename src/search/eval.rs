//! Cached position evaluation.

use crate::core::{GameState, PlayerId};
use crate::error::Result;
use crate::nn::{Encoder, Network};
use crate::rules::RulesEngine;
use crate::search::cache::EvalCache;

/// Weight of the final score in a position's value.
pub const END_SCORE_WEIGHT: f64 = 1e-5;

/// Weight of hand size in a position's value.
pub const HAND_WEIGHT: f64 = 1e-7;

/// Value network with its encoder.
#[derive(Clone, Debug)]
pub struct ValueModel {
    pub encoder: Encoder,
    pub network: Network,
    /// Network forward passes made through `evaluate`.
    pub forwards: u64,
}

impl ValueModel {
    #[must_use]
    pub fn new(encoder: Encoder, network: Network) -> Self {
        Self {
            encoder,
            network,
            forwards: 0,
        }
    }

    /// Win probabilities of every seat, viewpoint first.
    pub fn win_probabilities(&mut self, state: &GameState, viewpoint: PlayerId) -> Result<Vec<f64>> {
        let features = self.encoder.encode(state, viewpoint);
        self.network.set_inputs(&features)?;
        self.forwards += 1;
        Ok(self.network.forward().to_vec())
    }
}

/// Value of `state` for `viewpoint`: its win probability with small nudges
/// for final score and hand size. Ended games are scored before encoding.
pub fn evaluate<R: RulesEngine + ?Sized>(
    rules: &R,
    model: &mut ValueModel,
    cache: &mut EvalCache,
    state: &GameState,
    viewpoint: PlayerId,
) -> Result<f64> {
    let slot = cache.lookup_or_create(state, viewpoint);
    if let Some(score) = *slot {
        log::trace!("cached value {score:.6} for {viewpoint}");
        return Ok(score);
    }

    let finished;
    let state = if state.game_over {
        let mut copy = state.clone();
        rules.score_game(&mut copy);
        finished = copy;
        &finished
    } else {
        state
    };

    let probs = model.win_probabilities(state, viewpoint)?;
    let score = probs[0]
        + f64::from(state.players[viewpoint].end_score) * END_SCORE_WEIGHT
        + f64::from(state.hand_size(viewpoint)) * HAND_WEIGHT;
    *slot = Some(score);
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::galaxy;
    use crate::nn::NetShape;
    use crate::search::simulate;

    fn model(state: &GameState) -> ValueModel {
        let encoder = Encoder::eval(state.shared_library(), state.ruleset);
        let shape = NetShape::new(encoder.inputs(), 8, encoder.outputs());
        let network = Network::build(shape, encoder.layout().id, 0.01, 1);
        ValueModel::new(encoder, network)
    }

    #[test]
    fn test_second_evaluation_hits_cache() {
        let (rules, state) = galaxy::new_game(galaxy::Options::new(2), 3);
        let mut model = model(&state);
        let mut cache = EvalCache::new(64);
        let sim = simulate(&state, PlayerId::new(0), 1);

        let first = evaluate(&rules, &mut model, &mut cache, &sim, PlayerId::new(0)).unwrap();
        let second = evaluate(&rules, &mut model, &mut cache, &sim, PlayerId::new(0)).unwrap();
        assert_eq!(first, second);
        assert_eq!(model.forwards, 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_value_is_bounded() {
        let (rules, state) = galaxy::new_game(galaxy::Options::new(3), 3);
        let mut model = model(&state);
        let mut cache = EvalCache::new(64);
        for p in 0..3 {
            let v = evaluate(&rules, &mut model, &mut cache, &state, PlayerId::new(p)).unwrap();
            assert!(v > 0.0 && v < 1.01);
        }
    }
}
