//! Learned evaluation: a small softmax network and the encoders feeding it.
//!
//! - `Network`: incremental forward pass, accumulate/commit training,
//!   bounded sample ring, text persistence
//! - `Encoder`: value-network and action-predictor feature layouts

pub mod encoder;
pub mod network;

pub use encoder::{Encoder, EncoderKind, FeatureLayout, FeatureVector, LayoutId};
pub use network::{NetShape, Network, Sample};
