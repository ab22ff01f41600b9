//! 評価器同士の自己対局ツール

pub mod selfplay;
