//! 基本型
//!
//! - `Coord` / `Direction`: 升目と直交4方向
//! - `Piece` / `Side`: 駒種と陣営
//! - `Capture` / `Move`: 解決済みの取りと指し手

mod coord;
mod moves;
mod piece;

pub use coord::{BOARD_SIZE, Coord, Direction};
pub use moves::{Capture, Captures, Move};
pub use piece::{Piece, Side};
