use thiserror::Error;

use crate::board::{Board, bit};
use crate::model::{InferenceError, Scorer};
use crate::rules::flips;
use crate::types::{BOARD_SIZE, Coord, NUM_SQUARES, Side};

const MAGIC: &[u8; 4] = b"NTRV";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 20;

/// Score given to occupied squares. Finite so that score validation accepts it.
const OCCUPIED_SCORE: f32 = f32::MIN;

/// Weights file rejected while loading a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelLoadError {
    #[error("weights data too short: expected at least {min} bytes, got {0}", min = HEADER_SIZE)]
    TooShort(usize),
    #[error("invalid weights magic (expected NTRV)")]
    Magic,
    #[error("unsupported weights version: expected {expected}, got {0}", expected = VERSION)]
    Version(u32),
    #[error("CRC32 mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Checksum { expected: u32, actual: u32 },
    #[error("header declares {count} tuples but the payload holds {available} bytes")]
    TupleCount { count: usize, available: usize },
    #[error("unexpected EOF while reading {section} #{tuple}")]
    Eof { section: &'static str, tuple: usize },
    #[error("tuple #{0} contains out-of-range board position")]
    TuplePosition(usize),
    #[error("3^tuple_size overflow")]
    Overflow,
    #[error("weights payload has trailing bytes")]
    TrailingBytes,
}

/// N-Tuple value network loaded from the `NTRV` weights format.
///
/// Layout: 4-byte magic, then little-endian u32 version, tuple count, CRC32 of
/// the payload and a reserved word. The payload holds every tuple definition
/// (length byte followed by square indices) and then `3^len` f32 weights per
/// tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct NTupleScorer {
    tuples: Vec<Vec<u8>>,
    weights: Vec<Vec<f32>>,
}

impl NTupleScorer {
    pub fn from_bytes(data: &[u8]) -> Result<Self, ModelLoadError> {
        if data.len() < HEADER_SIZE {
            return Err(ModelLoadError::TooShort(data.len()));
        }

        if &data[0..4] != MAGIC {
            return Err(ModelLoadError::Magic);
        }

        let version = read_u32_le(data, 4)?;
        if version != VERSION {
            return Err(ModelLoadError::Version(version));
        }

        let num_tuples = read_u32_le(data, 8)? as usize;
        let expected = read_u32_le(data, 12)?;
        let payload = &data[HEADER_SIZE..];

        let actual = crc32fast::hash(payload);
        if actual != expected {
            return Err(ModelLoadError::Checksum { expected, actual });
        }

        // Every tuple costs at least its length byte.
        if num_tuples > payload.len() {
            return Err(ModelLoadError::TupleCount {
                count: num_tuples,
                available: payload.len(),
            });
        }

        let mut offset = 0usize;
        let mut tuples = Vec::with_capacity(num_tuples);
        for tuple_idx in 0..num_tuples {
            if offset >= payload.len() {
                return Err(ModelLoadError::Eof {
                    section: "tuple definition",
                    tuple: tuple_idx,
                });
            }

            let tuple_size = payload[offset] as usize;
            offset += 1;

            if offset + tuple_size > payload.len() {
                return Err(ModelLoadError::Eof {
                    section: "tuple positions",
                    tuple: tuple_idx,
                });
            }

            let tuple = payload[offset..offset + tuple_size].to_vec();
            if tuple.iter().any(|&pos| pos as usize >= NUM_SQUARES) {
                return Err(ModelLoadError::TuplePosition(tuple_idx));
            }
            offset += tuple_size;
            tuples.push(tuple);
        }

        let mut weights = Vec::with_capacity(num_tuples);
        for (tuple_idx, tuple) in tuples.iter().enumerate() {
            let entries = pow3(tuple.len())?;
            let bytes_len = entries.checked_mul(4).ok_or(ModelLoadError::Overflow)?;

            if offset + bytes_len > payload.len() {
                return Err(ModelLoadError::Eof {
                    section: "weights for tuple",
                    tuple: tuple_idx,
                });
            }

            let tuple_weights: Vec<f32> = payload[offset..offset + bytes_len]
                .chunks_exact(4)
                .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect();

            offset += bytes_len;
            weights.push(tuple_weights);
        }

        if offset != payload.len() {
            return Err(ModelLoadError::TrailingBytes);
        }

        Ok(Self { tuples, weights })
    }

    /// Board value from `side`'s perspective, summed over four rotations.
    pub fn evaluate(&self, board: &Board, side: Side) -> f32 {
        let me = board.stones(side);
        let opp = board.stones(side.opponent());
        let mut score = 0.0f32;

        for rotation in 0..4u8 {
            for (tuple, weights) in self.tuples.iter().zip(self.weights.iter()) {
                let idx = tuple.iter().fold(0usize, |acc, &pos| {
                    let square = bit(rotate_pos(pos, rotation));
                    let value = if (me & square) != 0 {
                        1
                    } else if (opp & square) != 0 {
                        2
                    } else {
                        0
                    };
                    acc * 3 + value
                });
                score += weights[idx];
            }
        }

        score
    }
}

impl Scorer for NTupleScorer {
    /// Each empty square scores the value of the position after `side` plays
    /// there, seen from `side`.
    fn score(&self, board: &Board, side: Side) -> Result<Vec<f32>, InferenceError> {
        let scores = (0..NUM_SQUARES)
            .filter_map(Coord::from_index)
            .map(|coord| {
                if !board.is_empty_at(coord) {
                    return OCCUPIED_SCORE;
                }
                let next = board.with_placement(coord, side, flips(board, coord, side));
                -self.evaluate(&next, side.opponent())
            })
            .collect();
        Ok(scores)
    }
}

fn rotate_pos(pos: u8, rotation: u8) -> usize {
    let row = (pos as usize) / BOARD_SIZE;
    let col = (pos as usize) % BOARD_SIZE;

    let (nr, nc) = match rotation % 4 {
        0 => (row, col),
        1 => (col, BOARD_SIZE - 1 - row),
        2 => (BOARD_SIZE - 1 - row, BOARD_SIZE - 1 - col),
        _ => (BOARD_SIZE - 1 - col, row),
    };

    nr * BOARD_SIZE + nc
}

fn read_u32_le(data: &[u8], offset: usize) -> Result<u32, ModelLoadError> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or(ModelLoadError::TooShort(data.len()))?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn pow3(exp: usize) -> Result<usize, ModelLoadError> {
    (0..exp).try_fold(1usize, |acc, _| acc.checked_mul(3).ok_or(ModelLoadError::Overflow))
}
