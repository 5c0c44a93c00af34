//! Temporal-difference training of the value network.

use crate::core::{GameState, PlayerId};
use crate::error::Result;
use crate::nn::Network;

/// Train every stored sample of `player` toward `target`, newest first, with
/// the error weight shrinking by `lambda_decay` per step back, then commit.
///
/// Returns the number of samples trained.
pub fn perform_training(network: &mut Network, player: PlayerId, target: &[f64], lambda_decay: f64) -> Result<usize> {
    let samples: Vec<Vec<f64>> = network
        .samples()
        .filter(|s| s.player == player)
        .map(|s| s.inputs.clone())
        .collect();
    if samples.is_empty() {
        return Ok(0);
    }

    let mut lambda = 1.0;
    for inputs in &samples {
        network.forward_raw(inputs)?;
        network.train(lambda, target);
        lambda *= lambda_decay;
    }
    network.commit();
    Ok(samples.len())
}

/// Win-probability target for a finished game, viewpoint first. Shared wins
/// split the mass.
#[must_use]
pub fn outcome_target(state: &GameState, viewpoint: PlayerId) -> Vec<f64> {
    let n = state.player_count();
    let winners = state.players.iter().filter(|(_, p)| p.winner).count();
    viewpoint
        .rotation(n)
        .map(|p| {
            if winners == 0 {
                1.0 / n as f64
            } else if state.players[p].winner {
                1.0 / winners as f64
            } else {
                0.0
            }
        })
        .collect()
}
