//! Crate-wide error type.
//!
//! Recoverable conditions (an illegal candidate during scoring) never reach
//! this type; they are skipped where they occur. Everything here is either a
//! load failure the caller recovers from by bootstrapping, or a fatal
//! condition that must abort the current game.

use std::path::PathBuf;

use thiserror::Error;

use crate::ai::DecisionKind;
use crate::core::PlayerId;

/// Errors raised by the decision engine and its networks.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed weight file {path} at line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("network shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    #[error("feature layout mismatch: network expects {expected:#x}, vector built for {found:#x}")]
    LayoutMismatch { expected: u64, found: u64 },

    #[error("complete_turn called on a real game state")]
    NotHypothetical,

    #[error("no legal candidate for {kind:?} decision of {player} in round {round}")]
    SearchExhausted {
        kind: DecisionKind,
        player: PlayerId,
        round: u32,
    },

    #[error("illegal {kind:?} reply from {player}")]
    IllegalReply { kind: DecisionKind, player: PlayerId },

    #[error("{table} overflowed its capacity of {capacity}")]
    CapacityExceeded { table: &'static str, capacity: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether this error must abort the game rather than be recovered.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::NotHypothetical
                | Error::SearchExhausted { .. }
                | Error::IllegalReply { .. }
                | Error::CapacityExceeded { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::NotHypothetical.is_fatal());
        assert!(Error::CapacityExceeded { table: "scores", capacity: 4 }.is_fatal());
        assert!(!Error::ShapeMismatch { expected: (1, 2, 3), found: (1, 2, 4) }.is_fatal());
        assert!(!Error::InvalidConfig("x".into()).is_fatal());
    }

    #[test]
    fn test_display_names_decision() {
        let err = Error::SearchExhausted {
            kind: DecisionKind::Payment,
            player: PlayerId::new(1),
            round: 4,
        };
        let text = err.to_string();
        assert!(text.contains("Payment"));
        assert!(text.contains("Player 1"));
        assert!(text.contains("round 4"));
    }
}
