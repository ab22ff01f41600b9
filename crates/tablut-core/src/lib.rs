//! # tablut-core
//!
//! 9×9 Tablut（Ashton ルール）のルールエンジンと指し手評価のコアライブラリ。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Coord, Direction, Piece, Side, Capture, Move）
//! - `board`: 盤の地形（脱出升・陣地・城）
//! - `position`: 局面表現、指し手インデックスとその差分更新、apply/simulate/undo
//! - `threat`: 取りの脅威マップと試行時の差分集計
//! - `mate`: 王の脱出の両取り判定
//! - `eval`: 重み付きの指し手評価と確率付き候補手
//! - `opening_book`: 1手目・2手目の定跡
//! - `error`: 文字列表記・任意局面の入力エラー
//!

// 基本型と地形
pub mod board;
pub mod error;
pub mod types;

// 局面
pub mod position;

// 評価
pub mod eval;
pub mod mate;
pub mod opening_book;
pub mod threat;

pub use error::{ParseError, PositionError};
pub use eval::{Candidate, Evaluator, Weights};
pub use position::{GameResult, Grid, Outcome, Position, Termination};
pub use types::{BOARD_SIZE, Capture, Coord, Direction, Move, Piece, Side};
