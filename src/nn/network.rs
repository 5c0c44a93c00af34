//! Two-layer perceptron with a softmax head.
//!
//! Inputs feed a tanh hidden layer; outputs are a max-shifted softmax, so the
//! result is always a probability distribution. The forward pass is
//! incremental: only inputs whose value changed since the previous forward are
//! added into the hidden sums. Training accumulates weight deltas that are only
//! applied by `commit`, so a network is never modified while it is being
//! evaluated by a search.
//!
//! ## Weight file
//!
//! ```text
//! <inputs> <hidden> <outputs>
//! <iterations>
//! <input name>            (one line per input, blank if unnamed)
//! <hidden weight>         ((inputs + 1) * hidden lines, bias row last)
//! <output weight>         ((hidden + 1) * outputs lines, bias row last)
//! ```

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::encoder::{FeatureVector, LayoutId};
use crate::core::PlayerId;
use crate::error::{Error, Result};

/// Initial weights are drawn uniformly from `[-INIT_RANGE, INIT_RANGE]`.
const INIT_RANGE: f64 = 0.1;

/// Input, hidden and output node counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetShape {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl NetShape {
    #[must_use]
    pub const fn new(inputs: usize, hidden: usize, outputs: usize) -> Self {
        Self { inputs, hidden, outputs }
    }

    fn as_tuple(self) -> (usize, usize, usize) {
        (self.inputs, self.hidden, self.outputs)
    }
}

/// A past input vector, remembered for temporal-difference training.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub player: PlayerId,
    pub inputs: Vec<f64>,
}

#[derive(Clone, Debug)]
pub struct Network {
    shape: NetShape,
    layout: LayoutId,
    learning_rate: f64,

    /// `(inputs + 1) x hidden`, row per input, bias row last.
    hidden_weights: Vec<f64>,
    /// `(hidden + 1) x outputs`, row per hidden node, bias row last.
    output_weights: Vec<f64>,
    hidden_delta: Vec<f64>,
    output_delta: Vec<f64>,

    input_values: Vec<f64>,
    /// Inputs already folded into `hidden_sum`.
    prev_input: Vec<f64>,
    hidden_sum: Vec<f64>,
    hidden_result: Vec<f64>,
    net: Vec<f64>,
    probs: Vec<f64>,

    iterations: u64,
    names: Vec<String>,
    samples: VecDeque<Sample>,
    sample_window: usize,
}

impl Network {
    /// Build a network with small random weights.
    #[must_use]
    pub fn build(shape: NetShape, layout: LayoutId, learning_rate: f64, seed: u64) -> Self {
        assert!(shape.inputs > 0 && shape.hidden > 0 && shape.outputs > 0, "Empty network layer");

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let hidden_len = (shape.inputs + 1) * shape.hidden;
        let output_len = (shape.hidden + 1) * shape.outputs;
        let hidden_weights = (0..hidden_len).map(|_| rng.gen_range(-INIT_RANGE..INIT_RANGE)).collect();
        let output_weights = (0..output_len).map(|_| rng.gen_range(-INIT_RANGE..INIT_RANGE)).collect();

        let mut net = Self {
            shape,
            layout,
            learning_rate,
            hidden_weights,
            output_weights,
            hidden_delta: vec![0.0; hidden_len],
            output_delta: vec![0.0; output_len],
            input_values: vec![0.0; shape.inputs],
            prev_input: vec![0.0; shape.inputs],
            hidden_sum: vec![0.0; shape.hidden],
            hidden_result: vec![0.0; shape.hidden],
            net: vec![0.0; shape.outputs],
            probs: vec![1.0 / shape.outputs as f64; shape.outputs],
            iterations: 0,
            names: vec![String::new(); shape.inputs],
            samples: VecDeque::new(),
            sample_window: 32,
        };
        net.reset_incremental();
        net
    }

    /// Limit the number of remembered samples.
    #[must_use]
    pub fn with_sample_window(mut self, window: usize) -> Self {
        self.sample_window = window;
        self
    }

    #[must_use]
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.set_names(names);
        self
    }

    pub fn set_names(&mut self, mut names: Vec<String>) {
        names.resize(self.shape.inputs, String::new());
        self.names = names;
    }

    #[must_use]
    pub fn shape(&self) -> NetShape {
        self.shape
    }

    #[must_use]
    pub fn layout(&self) -> LayoutId {
        self.layout
    }

    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn inputs(&self) -> &[f64] {
        &self.input_values
    }

    /// Output distribution of the last `forward`.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probs
    }

    /// Load a feature vector as the current input.
    pub fn set_inputs(&mut self, features: &FeatureVector) -> Result<()> {
        if features.layout() != self.layout {
            return Err(Error::LayoutMismatch {
                expected: self.layout.0,
                found: features.layout().0,
            });
        }
        self.load_raw(features.values())
    }

    fn load_raw(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.shape.inputs {
            return Err(Error::ShapeMismatch {
                expected: self.shape.as_tuple(),
                found: (values.len(), self.shape.hidden, self.shape.outputs),
            });
        }
        self.input_values.copy_from_slice(values);
        Ok(())
    }

    /// Forget incremental state so the next forward recomputes every input.
    pub fn reset_incremental(&mut self) {
        let bias = self.shape.inputs * self.shape.hidden;
        self.hidden_sum
            .copy_from_slice(&self.hidden_weights[bias..bias + self.shape.hidden]);
        self.prev_input.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Run the network on the current inputs and return the output
    /// distribution.
    pub fn forward(&mut self) -> &[f64] {
        let hidden = self.shape.hidden;

        for i in 0..self.shape.inputs {
            let diff = self.input_values[i] - self.prev_input[i];
            if diff == 0.0 {
                continue;
            }
            let row = &self.hidden_weights[i * hidden..(i + 1) * hidden];
            for (sum, w) in self.hidden_sum.iter_mut().zip(row) {
                *sum += diff * w;
            }
            self.prev_input[i] = self.input_values[i];
        }

        for (out, sum) in self.hidden_result.iter_mut().zip(&self.hidden_sum) {
            *out = sum.tanh();
        }

        let outputs = self.shape.outputs;
        let bias = &self.output_weights[hidden * outputs..];
        self.net.copy_from_slice(bias);
        for (j, h) in self.hidden_result.iter().enumerate() {
            let row = &self.output_weights[j * outputs..(j + 1) * outputs];
            for (n, w) in self.net.iter_mut().zip(row) {
                *n += h * w;
            }
        }

        let max = self.net.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut total = 0.0;
        for (p, n) in self.probs.iter_mut().zip(&self.net) {
            *p = (n - max).exp();
            total += *p;
        }
        for p in &mut self.probs {
            *p /= total;
        }
        &self.probs
    }

    /// Accumulate a gradient step toward `target` for the current inputs.
    ///
    /// Uses the outputs of the last `forward`; `lambda` scales the error.
    /// Nothing changes until `commit`.
    pub fn train(&mut self, lambda: f64, target: &[f64]) {
        assert_eq!(target.len(), self.shape.outputs, "Target length must match outputs");
        let (inputs, hidden, outputs) = self.shape.as_tuple();

        let error: Vec<f64> = self.probs.iter().zip(target).map(|(p, t)| lambda * (p - t)).collect();

        // Error at the softmax inputs.
        let mut dnet = vec![0.0; outputs];
        for (k, d) in dnet.iter_mut().enumerate() {
            for (i, e) in error.iter().enumerate() {
                let kron = if i == k { 1.0 } else { 0.0 };
                *d += e * self.probs[i] * (kron - self.probs[k]);
            }
        }

        let mut dhidden = vec![0.0; hidden];
        for (j, dh) in dhidden.iter_mut().enumerate() {
            let row = &self.output_weights[j * outputs..(j + 1) * outputs];
            let back: f64 = row.iter().zip(&dnet).map(|(w, d)| w * d).sum();
            let h = self.hidden_result[j];
            *dh = back * (1.0 - h * h);
        }

        let rate = self.learning_rate;
        for j in 0..=hidden {
            let h = if j == hidden { 1.0 } else { self.hidden_result[j] };
            let row = &mut self.output_delta[j * outputs..(j + 1) * outputs];
            for (delta, d) in row.iter_mut().zip(&dnet) {
                *delta -= rate * d * h;
            }
        }

        for i in 0..=inputs {
            let x = if i == inputs { 1.0 } else { self.input_values[i] };
            if x == 0.0 {
                continue;
            }
            let row = &mut self.hidden_delta[i * hidden..(i + 1) * hidden];
            for (delta, dh) in row.iter_mut().zip(&dhidden) {
                *delta -= rate * dh * x;
            }
        }
    }

    /// Apply accumulated deltas.
    pub fn commit(&mut self) {
        for (w, d) in self.hidden_weights.iter_mut().zip(self.hidden_delta.iter_mut()) {
            *w += *d;
            *d = 0.0;
        }
        for (w, d) in self.output_weights.iter_mut().zip(self.output_delta.iter_mut()) {
            *w += *d;
            *d = 0.0;
        }
        self.iterations += 1;
        self.reset_incremental();
    }

    // === Samples ===

    /// Remember the current inputs as seen by `player`.
    pub fn store_sample(&mut self, player: PlayerId) {
        if self.sample_window == 0 {
            return;
        }
        if self.samples.len() == self.sample_window {
            self.samples.pop_back();
        }
        self.samples.push_front(Sample {
            player,
            inputs: self.input_values.clone(),
        });
    }

    /// Forget the samples stored for one seat.
    pub fn drop_samples_of(&mut self, player: PlayerId) {
        self.samples.retain(|s| s.player != player);
    }

    pub fn clear_samples(&mut self) {
        self.samples.clear();
    }

    /// Stored samples, newest first.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Forward a raw stored input vector.
    pub(crate) fn forward_raw(&mut self, values: &[f64]) -> Result<&[f64]> {
        self.load_raw(values)?;
        Ok(self.forward())
    }

    /// Train toward uniform outputs on random sparse inputs.
    ///
    /// Used once on a freshly bootstrapped network so early play is not
    /// dominated by the random initial weights.
    pub fn pretrain(&mut self, iterations: usize, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let uniform = vec![1.0 / self.shape.outputs as f64; self.shape.outputs];
        for _ in 0..iterations {
            for v in &mut self.input_values {
                *v = if rng.gen_bool(0.1) { 1.0 } else { 0.0 };
            }
            self.forward();
            self.train(1.0, &uniform);
            self.commit();
        }
        self.iterations = 0;
    }

    // === Persistence ===

    pub fn save(&self, path: &Path) -> Result<()> {
        let io = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io)?;
        let mut out = BufWriter::new(file);
        let (inputs, hidden, outputs) = self.shape.as_tuple();

        writeln!(out, "{inputs} {hidden} {outputs}").map_err(io)?;
        writeln!(out, "{}", self.iterations).map_err(io)?;
        for name in &self.names {
            writeln!(out, "{name}").map_err(io)?;
        }
        for w in self.hidden_weights.iter().chain(&self.output_weights) {
            writeln!(out, "{w}").map_err(io)?;
        }
        out.flush().map_err(io)?;
        log::info!("{:<32}{:<32}", "saved network", path.display());
        Ok(())
    }

    /// Replace weights, counter and names with the contents of `path`.
    ///
    /// The file must describe exactly this network's shape; on any error the
    /// network is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut lines = BufReader::new(file).lines().enumerate();
        let mut next = |what: &str| -> Result<(usize, String)> {
            match lines.next() {
                Some((n, Ok(line))) => Ok((n + 1, line)),
                Some((_, Err(source))) => Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                }),
                None => Err(Error::Parse {
                    path: path.to_path_buf(),
                    line: 0,
                    reason: format!("unexpected end of file reading {what}"),
                }),
            }
        };
        let parse_err = |line: usize, reason: String| Error::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let (n, header) = next("header")?;
        let dims: Vec<usize> = header
            .split_whitespace()
            .map(str::parse)
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| parse_err(n, format!("bad header: {e}")))?;
        let found = match dims.as_slice() {
            [i, h, o] => (*i, *h, *o),
            _ => return Err(parse_err(n, "header needs three sizes".into())),
        };
        if found != self.shape.as_tuple() {
            return Err(Error::ShapeMismatch {
                expected: self.shape.as_tuple(),
                found,
            });
        }

        let (n, counter) = next("iteration counter")?;
        let iterations = counter
            .trim()
            .parse()
            .map_err(|e| parse_err(n, format!("bad iteration counter: {e}")))?;

        let mut names = Vec::with_capacity(self.shape.inputs);
        for _ in 0..self.shape.inputs {
            names.push(next("input names")?.1);
        }

        let mut weights = |count: usize| -> Result<Vec<f64>> {
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                let (n, line) = next("weights")?;
                let w = line
                    .trim()
                    .parse()
                    .map_err(|e| parse_err(n, format!("bad weight: {e}")))?;
                out.push(w);
            }
            Ok(out)
        };
        let hidden_weights = weights(self.hidden_weights.len())?;
        let output_weights = weights(self.output_weights.len())?;

        self.hidden_weights = hidden_weights;
        self.output_weights = output_weights;
        self.iterations = iterations;
        self.names = names;
        self.hidden_delta.iter_mut().for_each(|d| *d = 0.0);
        self.output_delta.iter_mut().for_each(|d| *d = 0.0);
        self.reset_incremental();
        log::info!("{:<32}{:<32}", "loaded network", path.display());
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn weights(&self) -> (&[f64], &[f64]) {
        (&self.hidden_weights, &self.output_weights)
    }
}
