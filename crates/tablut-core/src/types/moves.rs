//! 取り（Capture）と指し手（Move）

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use super::{Coord, Piece};

/// 解決済みの取り（取られる駒とその升）
///
/// 脅威マップのキーとして値で比較する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capture {
    pub piece: Piece,
    pub at: Coord,
}

impl Capture {
    #[inline]
    pub const fn new(piece: Piece, at: Coord) -> Self {
        Capture { piece, at }
    }
}

/// 1手で発生する取り（着地点の4方向なので最大4つ）
pub type Captures = SmallVec<[Capture; 4]>;

/// 指し手
///
/// `captures` は生成時点の盤面で解決済み。`score` は評価器が書き込む作業領域で、
/// 等価比較には含めない。
#[derive(Debug, Clone)]
pub struct Move {
    pub piece: Piece,
    pub from: Coord,
    pub to: Coord,
    pub captures: Captures,
    pub score: f64,
}

impl Move {
    #[cfg(test)]
    pub fn new(piece: Piece, from: Coord, to: Coord) -> Self {
        Move {
            piece,
            from,
            to,
            captures: Captures::new(),
            score: 0.0,
        }
    }

    pub fn with_captures(piece: Piece, from: Coord, to: Coord, captures: Captures) -> Self {
        Move {
            piece,
            from,
            to,
            captures,
            score: 0.0,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    /// 王を取る手か
    #[inline]
    pub fn captures_king(&self) -> bool {
        self.captures.iter().any(|c| c.piece.is_king())
    }

    /// 順位付け用の比較（スコア降順）
    ///
    /// 安定ソートと組み合わせることで同点は挿入順を保つ。
    #[inline]
    pub fn rank_cmp(&self, other: &Move) -> Ordering {
        other.score.total_cmp(&self.score)
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.piece == other.piece
            && self.from == other.from
            && self.to == other.to
            && self.captures == other.captures
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)?;
        for c in &self.captures {
            write!(f, "x{}", c.at)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_move_equality_ignores_score() {
        let mut a = Move::new(Piece::Attacker, Coord::new(0, 3), Coord::new(2, 3));
        let b = a.clone();
        a.score = 42.0;
        assert_eq!(a, b);
    }

    #[test]
    fn test_move_display() {
        let mv = Move::with_captures(
            Piece::Attacker,
            Coord::new(3, 8),
            Coord::new(3, 4),
            smallvec![Capture::new(Piece::Defender, Coord::new(2, 4))],
        );
        assert_eq!(mv.to_string(), "i4-e4xe3");
        assert!(mv.is_capture());
        assert!(!mv.captures_king());
    }

    #[test]
    fn test_rank_cmp_is_descending_and_stable() {
        let mut moves: Vec<Move> = (0..4)
            .map(|i| {
                let mut m = Move::new(Piece::Defender, Coord::new(2, 4), Coord::new(2, i));
                m.score = if i % 2 == 0 { 1.0 } else { 2.0 };
                m
            })
            .collect();
        moves.sort_by(Move::rank_cmp);
        let cols: Vec<usize> = moves.iter().map(|m| m.to.col()).collect();
        assert_eq!(cols, vec![1, 3, 0, 2]);
    }
}
