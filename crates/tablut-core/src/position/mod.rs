//! 局面表現モジュール
//!
//! - `Grid`: 駒配置（千日手判定の単位）
//! - `rules`: 着地の合法性と取りの解決
//! - `ActionIndex`: 駒ごとの4方向の指し手列
//! - `RepairPlan`: 1手ごとのインデックス差分更新（確定と試行で共有）
//! - `Position`: 局面本体（手番・駒数・終局状態・履歴）
//!
//! `ActionIndex` は `Position` の確定手（`apply`）を通じてのみ更新され、
//! 常に `ActionIndex::build(grid)` と一致するように保つ。

mod action_index;
mod grid;
mod pos;
mod repair;
pub mod rules;

pub use action_index::{ActionIndex, Rays, generate_rays};
pub use grid::Grid;
pub use pos::{GameResult, Outcome, Position, Termination};
pub use repair::{RepairPlan, RepairSink, changed_cells};
