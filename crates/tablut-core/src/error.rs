//! 外部入力の解析・局面復元のエラー型
//!
//! ルール上の契約違反（終局後の着手、simulate/undo の対応崩れなど）は
//! ここには含めず panic させる。

use crate::types::Coord;

/// 文字列表記の解析エラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 升目表記が不正
    #[error("invalid coordinate: {0:?}")]
    InvalidCoord(String),

    /// 指し手表記が不正
    #[error("invalid move: {0:?}")]
    InvalidMove(String),

    /// 盤面の行数が9でない
    #[error("expected 9 board rows, got {0}")]
    RowCount(usize),

    /// 盤面の列数が9でない
    #[error("row {row}: expected 9 cells, got {len}")]
    RowLength { row: usize, len: usize },

    /// 未知の駒文字
    #[error("row {row}, column {col}: unknown cell character {ch:?}")]
    UnknownCell { row: usize, col: usize, ch: char },
}

/// 任意盤面から局面を復元する際のエラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// 王が複数ある
    #[error("more than one king on the board ({0} and {1})")]
    MultipleKings(Coord, Coord),

    /// 王以外の駒が城に置かれている
    #[error("only the king may stand on the citadel, found a piece at {0}")]
    PieceOnCitadel(Coord),

    /// 盤面文字列の解析失敗
    #[error(transparent)]
    Parse(#[from] ParseError),
}
