//! 定跡（1手目と2手目）
//!
//! 守り方の初手は固定。攻め方の応手は、守り方の初手を盤の対称変換（D4）で
//! 「上の腕の駒が左へ動く」代表形に正規化して表を引き、逆変換で実際の盤に戻す。
//! 取りは実際の盤面の指し手インデックスから解決する。

use log::{debug, warn};

use crate::position::Position;
use crate::types::{BOARD_SIZE, Coord, Move, Side};

const LAST: usize = BOARD_SIZE - 1;

/// 盤の対称変換（二面体群 D4）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    Identity,
    /// 時計回り90度
    Rot90,
    Rot180,
    Rot270,
    /// 左右反転
    MirrorCols,
    /// 上下反転
    MirrorRows,
    /// 主対角線で反転
    Transpose,
    /// 副対角線で反転
    AntiTranspose,
}

impl Symmetry {
    pub const ALL: [Symmetry; 8] = [
        Symmetry::Identity,
        Symmetry::Rot90,
        Symmetry::Rot180,
        Symmetry::Rot270,
        Symmetry::MirrorCols,
        Symmetry::MirrorRows,
        Symmetry::Transpose,
        Symmetry::AntiTranspose,
    ];

    pub const fn apply(self, c: Coord) -> Coord {
        let (r, col) = (c.row(), c.col());
        let (nr, nc) = match self {
            Symmetry::Identity => (r, col),
            Symmetry::Rot90 => (col, LAST - r),
            Symmetry::Rot180 => (LAST - r, LAST - col),
            Symmetry::Rot270 => (LAST - col, r),
            Symmetry::MirrorCols => (r, LAST - col),
            Symmetry::MirrorRows => (LAST - r, col),
            Symmetry::Transpose => (col, r),
            Symmetry::AntiTranspose => (LAST - col, LAST - r),
        };
        Coord::new(nr, nc)
    }

    pub const fn inverse(self) -> Symmetry {
        match self {
            Symmetry::Rot90 => Symmetry::Rot270,
            Symmetry::Rot270 => Symmetry::Rot90,
            other => other,
        }
    }
}

/// 守り方の初手 e3-b3
pub const DEFENDER_OPENING: (Coord, Coord) = (Coord::new(2, 4), Coord::new(2, 1));

const CENTER_COL: usize = BOARD_SIZE / 2;

/// 正規形の初手 → 攻め方の応手
const REPLIES: [((Coord, Coord), (Coord, Coord)); 7] = [
    ((Coord::new(2, 4), Coord::new(2, 0)), (Coord::new(0, 5), Coord::new(2, 5))),
    ((Coord::new(2, 4), Coord::new(2, 1)), (Coord::new(0, 5), Coord::new(2, 5))),
    ((Coord::new(2, 4), Coord::new(2, 2)), (Coord::new(0, 5), Coord::new(2, 5))),
    ((Coord::new(2, 4), Coord::new(2, 3)), (Coord::new(1, 4), Coord::new(1, 6))),
    ((Coord::new(3, 4), Coord::new(3, 1)), (Coord::new(3, 8), Coord::new(3, 4))),
    ((Coord::new(3, 4), Coord::new(3, 2)), (Coord::new(3, 8), Coord::new(3, 4))),
    ((Coord::new(3, 4), Coord::new(3, 3)), (Coord::new(1, 4), Coord::new(1, 6))),
];

/// 初手を正規形に移す変換
///
/// 移動元が上の腕（中央列・城より上）に、移動先が左側に来る変換を探す。
pub fn canonical_symmetry(from: Coord, to: Coord) -> Option<Symmetry> {
    Symmetry::ALL.into_iter().find(|t| {
        let (f, d) = (t.apply(from), t.apply(to));
        f.col() == CENTER_COL && f.row() < CENTER_COL && d.col() < CENTER_COL
    })
}

/// 守り方の初手に対する攻め方の応手（移動元, 移動先）
pub fn reply_to(from: Coord, to: Coord) -> Option<(Coord, Coord)> {
    let t = canonical_symmetry(from, to)?;
    let key = (t.apply(from), t.apply(to));
    let (_, (rf, rt)) = REPLIES.iter().find(|(k, _)| *k == key)?;
    let inv = t.inverse();
    Some((inv.apply(*rf), inv.apply(*rt)))
}

/// 局面に対する定跡手
///
/// 平手初期局面から守り方が先手で始めた対局の1手目と2手目だけを返す。
/// 攻め方が先手の対局には定跡を持たない。
pub fn lookup(pos: &Position) -> Option<Move> {
    if !pos.book_enabled() || pos.is_terminal() {
        return None;
    }
    let (from, to) = match (pos.ply(), pos.side_to_move()) {
        (0, Side::Defender) => DEFENDER_OPENING,
        (1, Side::Attacker) => {
            let opening = pos.opening()?;
            reply_to(opening.from, opening.to)?
        }
        _ => return None,
    };
    match pos.find_move(from, to) {
        Some(mv) => {
            debug!("book move {mv}");
            Some(mv)
        }
        None => {
            warn!("book move {from}-{to} is not legal here");
            None
        }
    }
}
