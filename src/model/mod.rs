//! Scoring models and the registry that maps model keys to them.

use thiserror::Error;

use crate::board::Board;
use crate::types::{NUM_SQUARES, Side};

pub mod ntuple;
pub mod registry;

pub use ntuple::{ModelLoadError, NTupleScorer};
pub use registry::{LoadFailure, ModelRegistry};

/// A scoring model failed or produced unusable output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("model returned {len} scores, expected {expected}", expected = NUM_SQUARES)]
    ScoreCount { len: usize },
    #[error("model returned non-finite score {value} at index {index}")]
    NonFinite { index: usize, value: f32 },
    #[error("inference took {elapsed_ms} ms, budget is {budget_ms} ms")]
    Timeout { elapsed_ms: u128, budget_ms: u128 },
    #[error("model failed: {0}")]
    Model(String),
}

/// Maps a board to one desirability score per square.
///
/// Output index `i` scores the square `Coord::from_index(i)`. Implementations
/// are shared across requests, so `score` must be reentrant.
pub trait Scorer: Send + Sync {
    fn score(&self, board: &Board, side: Side) -> Result<Vec<f32>, InferenceError>;
}

/// Scores every square zero. With stable ranking this plays the lowest-index
/// legal square.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformScorer;

impl Scorer for UniformScorer {
    fn score(&self, _board: &Board, _side: Side) -> Result<Vec<f32>, InferenceError> {
        Ok(vec![0.0; NUM_SQUARES])
    }
}
