//! Opponent action prediction.
//!
//! The predictor network maps a seat's view of the game to a distribution
//! over that seat's legal selections. Action search weights each
//! combination of opponent selections by its predicted probability, keeping
//! only combinations above a threshold that halves until enough mass is
//! covered.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, PlayerId};
use crate::error::Result;
use crate::nn::{Encoder, Network};

/// Predictor network, its encoder and its accuracy counters.
#[derive(Clone, Debug)]
pub struct PredictModel {
    pub encoder: Encoder,
    pub network: Network,
    pub diagnostics: PredictionStats,
}

/// Accuracy of predictions checked against the selections actually made.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionStats {
    pub predictions: u64,
    pub hits: u64,
    pub squared_error: f64,
}

impl PredictionStats {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.predictions == 0 {
            0.0
        } else {
            self.hits as f64 / self.predictions as f64
        }
    }

    #[must_use]
    pub fn mean_error(&self) -> f64 {
        if self.predictions == 0 {
            0.0
        } else {
            self.squared_error / self.predictions as f64
        }
    }
}

impl PredictModel {
    #[must_use]
    pub fn new(encoder: Encoder, network: Network) -> Self {
        Self {
            encoder,
            network,
            diagnostics: PredictionStats::default(),
        }
    }

    /// Distribution over `player`'s selections, in `Ruleset::selections`
    /// order.
    pub fn predict(&mut self, state: &GameState, player: PlayerId) -> Result<Vec<f64>> {
        let features = self.encoder.encode(state, player);
        self.network.set_inputs(&features)?;
        Ok(self.network.forward().to_vec())
    }

    /// Score the prediction for `player` against the selection made, then
    /// train toward `target` (when `train` is set) and commit.
    pub fn observe(&mut self, state: &GameState, player: PlayerId, target: &[f64], chosen: usize, train: bool) -> Result<()> {
        let predicted = self.predict(state, player)?;
        let best = argmax(&predicted);
        self.diagnostics.predictions += 1;
        if best == Some(chosen) {
            self.diagnostics.hits += 1;
        }
        let error: f64 = predicted.iter().zip(target).map(|(p, t)| (p - t) * (p - t)).sum();
        self.diagnostics.squared_error += error / predicted.len() as f64;

        if train {
            self.network.train(1.0, target);
            self.network.commit();
        }
        Ok(())
    }
}

fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// One choice per opponent (indices into each distribution) and its joint
/// probability.
#[derive(Clone, Debug, PartialEq)]
pub struct Combo {
    pub choices: Vec<usize>,
    pub prob: f64,
}

/// Combinations whose joint probability stays at or above `threshold`.
#[must_use]
pub fn combos_above(dists: &[Vec<f64>], threshold: f64) -> Vec<Combo> {
    fn recurse(dists: &[Vec<f64>], prob: f64, threshold: f64, choices: &mut Vec<usize>, out: &mut Vec<Combo>) {
        let Some((first, rest)) = dists.split_first() else {
            out.push(Combo {
                choices: choices.clone(),
                prob,
            });
            return;
        };
        for (i, &p) in first.iter().enumerate() {
            let joint = prob * p;
            if joint < threshold {
                continue;
            }
            choices.push(i);
            recurse(rest, joint, threshold, choices, out);
            choices.pop();
        }
    }

    let mut out = Vec::new();
    recurse(dists, 1.0, threshold, &mut Vec::with_capacity(dists.len()), &mut out);
    out
}

/// Halve the threshold from 1 until the kept combinations cover `coverage`
/// of the probability mass or the threshold reaches `min_threshold`.
///
/// Returns the combinations and the final threshold. If nothing clears the
/// floor, the single most likely combination is returned.
#[must_use]
pub fn covering_combos(dists: &[Vec<f64>], coverage: f64, min_threshold: f64) -> (Vec<Combo>, f64) {
    let mut threshold = 1.0;
    loop {
        let combos = combos_above(dists, threshold);
        let mass: f64 = combos.iter().map(|c| c.prob).sum();
        if mass >= coverage || threshold <= min_threshold {
            if combos.is_empty() {
                return (vec![most_likely(dists)], threshold);
            }
            return (combos, threshold);
        }
        threshold = (threshold / 2.0).max(min_threshold);
    }
}

fn most_likely(dists: &[Vec<f64>]) -> Combo {
    let mut choices = Vec::with_capacity(dists.len());
    let mut prob = 1.0;
    for d in dists {
        let i = argmax(d).unwrap_or(0);
        prob *= d.get(i).copied().unwrap_or(0.0);
        choices.push(i);
    }
    Combo { choices, prob }
}

/// Softmax of `scores / temperature`, max-shifted.
#[must_use]
pub fn softmax_target(scores: &[f64], temperature: f64) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|s| ((s - max) / temperature).exp()).collect();
    let total: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / total).collect()
}
