use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use web_time::Instant;

use crate::board::{Board, BoardError};
use crate::config::ServiceConfig;
use crate::model::{InferenceError, LoadFailure, ModelLoadError, ModelRegistry};
use crate::rules::is_legal;
use crate::selector::{Scores, select_move};
use crate::types::{Move, Side};

const ROOT_MESSAGE: &str = "Othello AI API is running";
const STATUS_MESSAGE: &str = "API is running";

/// Body of a move prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub model_key: String,
    /// Eight rows of eight cells, `board[y][x]`.
    pub board: Vec<Vec<i32>>,
}

/// Contract:
/// - Normal move: `{ "x": .., "y": .. }`, both in `0..8`.
/// - Pass: `{ "pass": true }`. The flag is never written as `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResponse {
    Move { x: u8, y: u8 },
    Pass,
}

impl Serialize for MoveResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            MoveResponse::Move { x, y } => {
                let mut state = serializer.serialize_struct("MoveResponse", 2)?;
                state.serialize_field("x", &x)?;
                state.serialize_field("y", &y)?;
                state.end()
            }
            MoveResponse::Pass => {
                let mut state = serializer.serialize_struct("MoveResponse", 1)?;
                state.serialize_field("pass", &true)?;
                state.end()
            }
        }
    }
}

impl From<Move> for MoveResponse {
    fn from(mv: Move) -> Self {
        match mv {
            Move::Place(coord) => MoveResponse::Move {
                x: coord.x,
                y: coord.y,
            },
            Move::Pass => MoveResponse::Pass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub loaded_models: Vec<String>,
    pub failed_models: Vec<LoadFailure>,
}

/// Error payload handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub detail: String,
}

/// Rejected weights are the caller's fault.
impl From<&ModelLoadError> for ErrorBody {
    fn from(err: &ModelLoadError) -> Self {
        ErrorBody {
            status: 400,
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("Invalid model_key: {0}")]
    InvalidModelKey(String),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
    #[error("postcondition violated: {0}")]
    Postcondition(String),
}

impl PredictError {
    /// HTTP-style status: 400 for bad requests, 500 for server faults.
    pub fn status_code(&self) -> u16 {
        match self {
            PredictError::InvalidModelKey(_) | PredictError::Board(_) => 400,
            PredictError::Inference(_) | PredictError::Postcondition(_) => 500,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            status: self.status_code(),
            detail: self.to_string(),
        }
    }
}

/// Answers move requests against an explicitly built model registry.
#[derive(Debug)]
pub struct PredictService {
    registry: ModelRegistry,
    config: ServiceConfig,
}

impl PredictService {
    pub fn new(registry: ModelRegistry, config: ServiceConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry_mut(&mut self) -> &mut ModelRegistry {
        &mut self.registry
    }

    pub fn root(&self) -> RootResponse {
        RootResponse {
            message: ROOT_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            message: STATUS_MESSAGE.to_string(),
            loaded_models: self.registry.keys(),
            failed_models: self.registry.failures().to_vec(),
        }
    }

    pub fn predict(&self, request: &PredictRequest) -> Result<MoveResponse, PredictError> {
        self.predict_move(&request.model_key, &request.board)
            .map(MoveResponse::from)
    }

    /// Validates the request, scores the board with the requested model and
    /// picks the best legal move for the configured side.
    ///
    /// The model is only invoked once the key and the board are known to be
    /// valid.
    pub fn predict_move<R: AsRef<[i32]>>(
        &self,
        model_key: &str,
        raw_board: &[R],
    ) -> Result<Move, PredictError> {
        let scorer = self
            .registry
            .get(model_key)
            .ok_or_else(|| PredictError::InvalidModelKey(model_key.to_string()))?;
        let board = Board::parse(raw_board)?;
        let side = self.config.ai_side;

        let start = Instant::now();
        let raw_scores = scorer.score(&board, side)?;
        if let Some(budget) = self.config.inference_timeout() {
            let elapsed = start.elapsed();
            if elapsed > budget {
                return Err(InferenceError::Timeout {
                    elapsed_ms: elapsed.as_millis(),
                    budget_ms: budget.as_millis(),
                }
                .into());
            }
        }
        let scores = Scores::new(raw_scores)?;

        let mv = select_move(&board, &scores, side);
        check_selected(&board, mv, side)?;
        Ok(mv)
    }
}

fn check_selected(board: &Board, mv: Move, side: Side) -> Result<(), PredictError> {
    let Move::Place(coord) = mv else {
        return Ok(());
    };
    if !coord.is_on_board() {
        return Err(PredictError::Postcondition(format!(
            "selected ({}, {}) is outside the board",
            coord.x, coord.y
        )));
    }
    if !is_legal(board, coord, side) {
        return Err(PredictError::Postcondition(format!(
            "selected ({}, {}) is not a legal move",
            coord.x, coord.y
        )));
    }
    Ok(())
}
