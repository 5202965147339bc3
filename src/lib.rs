use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod model;
pub mod rules;
pub mod selector;
pub mod service;
pub mod types;
pub mod wasm;

pub use board::{Board, BoardError};
pub use rules::is_legal;
pub use selector::{Scores, select_move};
pub use types::{Cell, Coord, Move, Side};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
