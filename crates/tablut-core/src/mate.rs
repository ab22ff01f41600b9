//! 王の詰み（脱出の両取り）判定
//!
//! ここでの「詰み」は王側から見た勝ち筋で、攻め方が1手では塞ぎきれない脱出経路が
//! あることを指す。

use crate::board::{Cell, geometry};
use crate::position::Grid;
use crate::position::rules::{escape_ray, generate_ray};
use crate::types::{Coord, Direction, Side};

/// 王の脱出経路を数える
///
/// 方向ごとに、王から直接脱出升へ届くなら1とし（`mover` が攻め方ならその時点で詰み）、
/// その方向の王の各移動先（脱出升を除く）から直交2方向の脱出経路を加える。
/// どこかで合計が2に達したら詰み。
pub fn king_checkmate(grid: &Grid, king: Coord, mover: Side) -> bool {
    let geo = geometry();
    for dir in Direction::ALL {
        let mut initial = 0;
        if escape_ray(grid, king, dir) {
            if mover == Side::Attacker {
                return true;
            }
            initial = 1;
        }
        for mv in generate_ray(grid, king, dir) {
            if geo.is(mv.to, Cell::Escape) {
                continue;
            }
            let mut escapes = initial;
            for side in dir.perpendicular() {
                if escape_ray(grid, mv.to, side) {
                    escapes += 1;
                }
                if escapes > 1 {
                    return true;
                }
            }
        }
    }
    false
}

/// 王が1手で脱出升へ出られる方向ごとの、最も近い脱出升
pub fn escape_targets(grid: &Grid, king: Coord) -> Vec<(Direction, Coord)> {
    let geo = geometry();
    Direction::ALL
        .into_iter()
        .filter_map(|dir| {
            generate_ray(grid, king, dir)
                .into_iter()
                .find(|m| geo.is(m.to, Cell::Escape))
                .map(|m| (dir, m.to))
        })
        .collect()
}

/// `at` が王から `target` までの経路上（王は含まず、脱出升は含む）にあるか
pub fn blocks_path(king: Coord, target: Coord, at: Coord) -> bool {
    let (kr, kc) = (king.row(), king.col());
    let (tr, tc) = (target.row(), target.col());
    let (r, c) = (at.row(), at.col());
    if r == kr && tr == kr {
        (c > kc && c <= tc) || (c < kc && c >= tc)
    } else if c == kc && tc == kc {
        (r > kr && r <= tr) || (r < kr && r >= tr)
    } else {
        false
    }
}
