//! 合法性と取りの解決
//!
//! 盤面（`Grid`）と地形（`BoardGeometry`）だけを見る純粋関数群。
//! 指し手インデックスの構築・差分更新・評価時の試行はすべてここを通る。

use crate::board::{Cell, geometry};
use crate::types::{Capture, Captures, Coord, Direction, Move, Piece, Side};

use super::Grid;

/// `piece` が `from` から `to` へ着地できるか
///
/// 着地点が空で、地形が通常升・脱出升であるか、陣地から陣地へ移動する攻め方であること。
/// 城には誰も入れず、守り方と王は陣地に入れない。
#[inline]
pub fn is_legal_destination(grid: &Grid, piece: Piece, from: Coord, to: Coord) -> bool {
    if grid.is_occupied(to) {
        return false;
    }
    let geo = geometry();
    match geo.cell(to) {
        Cell::Empty | Cell::Escape => true,
        Cell::Camp => piece == Piece::Attacker && geo.is(from, Cell::Camp),
        Cell::Citadel => false,
    }
}

/// `at` が `side` にとって取りの壁になるか
///
/// 自陣営の駒（王は守り方扱い）、城、門以外の陣地が壁になる。
#[inline]
pub fn is_blocker(grid: &Grid, at: Coord, side: Side) -> bool {
    grid.get(at).side() == Some(side) || geometry().is_board_blocker(at)
}

/// 王が城の上または隣にいる場合の全周包囲判定
///
/// 城以外の直交近傍がすべて攻め方で埋まっていれば取れる。`arriving` は今まさに
/// 着地する攻め方の升で、盤面上はまだ空でも攻め方として数える。
/// 城から離れた王は通常の挟み取りなので常に true。
pub fn king_is_surrounded(grid: &Grid, king: Coord, arriving: Coord) -> bool {
    let geo = geometry();
    if !geo.is_at_or_next_to_citadel(king) {
        return true;
    }
    king.neighbors()
        .filter(|&n| !geo.is(n, Cell::Citadel))
        .all(|n| n == arriving || grid.get(n) == Piece::Attacker)
}

/// `piece` が `to` に着地したときに発生する取り
pub fn captures_at(grid: &Grid, piece: Piece, to: Coord) -> Captures {
    let mut captures = Captures::new();
    let Some(side) = piece.side() else {
        return captures;
    };
    for dir in Direction::ALL {
        let (Some(target), Some(far)) = (to.step(dir, 1), to.step(dir, 2)) else {
            continue;
        };
        let victim = grid.get(target);
        if !piece.is_enemy_of(victim) || !is_blocker(grid, far, side) {
            continue;
        }
        if victim.is_king() && !king_is_surrounded(grid, target, to) {
            continue;
        }
        captures.push(Capture::new(victim, target));
    }
    captures
}

/// `from` の駒の `dir` 方向の指し手を近い順に生成する
pub fn generate_ray(grid: &Grid, from: Coord, dir: Direction) -> Vec<Move> {
    let piece = grid.get(from);
    debug_assert!(!piece.is_empty(), "generate_ray from empty cell {from}");
    let mut moves = Vec::new();
    let mut cur = from.step(dir, 1);
    while let Some(to) = cur {
        if !is_legal_destination(grid, piece, from, to) {
            break;
        }
        moves.push(Move::with_captures(piece, from, to, captures_at(grid, piece, to)));
        cur = to.step(dir, 1);
    }
    moves
}

/// `from` から `dir` 方向に遮られずに脱出升へ届くか
pub fn escape_ray(grid: &Grid, from: Coord, dir: Direction) -> bool {
    let geo = geometry();
    let mut cur = from.step(dir, 1);
    while let Some(c) = cur {
        if grid.is_occupied(c) {
            return false;
        }
        match geo.cell(c) {
            Cell::Escape => return true,
            Cell::Empty => {}
            Cell::Camp | Cell::Citadel => return false,
        }
        cur = c.step(dir, 1);
    }
    false
}
