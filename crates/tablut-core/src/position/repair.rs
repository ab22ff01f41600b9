//! 指し手インデックスの差分更新
//!
//! 1手で駒の有無が変わる升は、移動元・移動先・取られた駒の升だけである。
//! これらの升（変化升）から影響範囲を求めて `RepairPlan` にまとめ、
//!
//! - `commit`: 保持している `ActionIndex` に書き込む（確定手）
//! - `replay`: `RepairSink` に差分を流すだけで、インデックスは変更しない（評価時の試行）
//!
//! のどちらかで実行する。どちらも同じ計画を走査するので、試行で得る差分と
//! 確定後のインデックスは常に一致する。
//!
//! 影響範囲:
//! 1. 空になった変化升はエントリを削除し、駒が置かれた変化升は4方向を作り直す。
//! 2. 変化升から各方向に最初にぶつかる駒の、変化升へ向かう方向の指し手列を作り直す。
//! 3. 変化升から取りの届く範囲（直交1〜2升と斜め1升）の空升へ着地する既存の指し手は、
//!    取りのリストだけを再計算する。

use smallvec::SmallVec;

use crate::types::{Captures, Coord, Direction, Move};

use super::action_index::{ActionIndex, Rays};
use super::rules::{captures_at, generate_ray};
use super::Grid;

/// 着地点の取りが変化升に依存しうる相対位置
const CAPTURE_REACH: [(i32, i32); 12] = [
    (-1, 0),
    (-2, 0),
    (1, 0),
    (2, 0),
    (0, -1),
    (0, -2),
    (0, 1),
    (0, 2),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// 差分更新の受け手（評価時の試行用）
///
/// 各メソッドは更新前の指し手と更新後の値を受け取る。
pub trait RepairSink {
    /// 駒がいなくなった升。`old` は更新前のエントリ。
    fn vacated(&mut self, at: Coord, old: Option<&Rays>);

    /// `from` の `dir` 方向の指し手列が作り直された
    fn ray_replaced(&mut self, from: Coord, dir: Direction, old: &[Move], new: &[Move]);

    /// 既存の指し手の取りが再計算された
    fn captures_changed(&mut self, mv: &Move, new: &Captures);
}

/// 1手分の更新計画
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairPlan {
    /// 空になった変化升
    vacated: SmallVec<[Coord; 5]>,
    /// 作り直す指し手列（駒の升, 方向）
    rays: Vec<(Coord, Direction)>,
    /// 取りを再計算する指し手（駒の升, 方向, 着地点）
    patches: Vec<(Coord, Direction, Coord)>,
}

/// 1手で駒の有無が変わる升
pub fn changed_cells(mv: &Move) -> SmallVec<[Coord; 6]> {
    let mut cells = SmallVec::new();
    cells.push(mv.from);
    cells.push(mv.to);
    cells.extend(mv.captures.iter().map(|c| c.at));
    cells
}

impl RepairPlan {
    /// 計画を立てる
    ///
    /// `grid` は更新後の盤面、`index` は更新前のインデックス。
    pub fn build(grid: &Grid, index: &ActionIndex, changed: &[Coord]) -> Self {
        let mut plan = RepairPlan::default();

        for &c in changed {
            if grid.is_occupied(c) {
                for dir in Direction::ALL {
                    plan.push_ray(c, dir);
                }
            } else if !plan.vacated.contains(&c) {
                plan.vacated.push(c);
            }
        }
        for &c in changed {
            for dir in Direction::ALL {
                if let Some(q) = grid.first_occupied(c, dir) {
                    plan.push_ray(q, dir.opposite());
                }
            }
        }

        for &c in changed {
            for (dr, dc) in CAPTURE_REACH {
                let Some(landing) = c.offset(dr, dc) else {
                    continue;
                };
                if grid.is_occupied(landing) {
                    continue;
                }
                for dir in Direction::ALL {
                    let Some(q) = grid.first_occupied(landing, dir) else {
                        continue;
                    };
                    let toward = dir.opposite();
                    if plan.rays.contains(&(q, toward)) {
                        continue;
                    }
                    if !index.ray(q, toward).iter().any(|m| m.to == landing) {
                        continue;
                    }
                    let patch = (q, toward, landing);
                    if !plan.patches.contains(&patch) {
                        plan.patches.push(patch);
                    }
                }
            }
        }
        plan
    }

    fn push_ray(&mut self, c: Coord, dir: Direction) {
        if !self.rays.contains(&(c, dir)) {
            self.rays.push((c, dir));
        }
    }

    pub fn vacated(&self) -> &[Coord] {
        &self.vacated
    }

    pub fn rays(&self) -> &[(Coord, Direction)] {
        &self.rays
    }

    pub fn patches(&self) -> &[(Coord, Direction, Coord)] {
        &self.patches
    }

    /// インデックスに書き込む
    pub fn commit(&self, grid: &Grid, index: &mut ActionIndex) {
        for &c in &self.vacated {
            index.remove(c);
        }
        for &(c, dir) in &self.rays {
            index.set_ray(c, dir, generate_ray(grid, c, dir));
        }
        for &(q, dir, landing) in &self.patches {
            let Some(ray) = index.ray_mut(q, dir) else {
                continue;
            };
            if let Some(mv) = ray.iter_mut().find(|m| m.to == landing) {
                mv.captures = captures_at(grid, mv.piece, landing);
            }
        }
    }

    /// インデックスを変更せずに差分を流す
    pub fn replay<S: RepairSink>(&self, grid: &Grid, index: &ActionIndex, sink: &mut S) {
        for &c in &self.vacated {
            sink.vacated(c, index.rays(c));
        }
        for &(c, dir) in &self.rays {
            let new = generate_ray(grid, c, dir);
            sink.ray_replaced(c, dir, index.ray(c, dir), &new);
        }
        for &(q, dir, landing) in &self.patches {
            if let Some(mv) = index.ray(q, dir).iter().find(|m| m.to == landing) {
                let new = captures_at(grid, mv.piece, landing);
                sink.captures_changed(mv, &new);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Capture, Piece};

    fn play(grid: &mut Grid, mv: &Move) {
        grid.set(mv.from, Piece::Empty);
        grid.set(mv.to, mv.piece);
        for cap in &mv.captures {
            grid.set(cap.at, Piece::Empty);
        }
    }

    fn commit(grid: &mut Grid, index: &mut ActionIndex, from: Coord, to: Coord) -> Move {
        let mv = index.find(from, to).cloned().unwrap();
        play(grid, &mv);
        RepairPlan::build(grid, index, &changed_cells(&mv)).commit(grid, index);
        mv
    }

    #[test]
    fn test_plan_for_quiet_move() {
        let mut grid = Grid::initial();
        let index = ActionIndex::build(&grid);
        let mv = index.find(Coord::new(2, 4), Coord::new(2, 1)).cloned().unwrap();
        play(&mut grid, &mv);
        let plan = RepairPlan::build(&grid, &index, &changed_cells(&mv));
        assert_eq!(plan.vacated(), &[Coord::new(2, 4)]);
        for dir in Direction::ALL {
            assert!(plan.rays().contains(&(Coord::new(2, 1), dir)));
        }
        // 移動元の上下の駒は移動元へ向かう方向が伸びる
        assert!(plan.rays().contains(&(Coord::new(1, 4), Direction::Down)));
        assert!(plan.rays().contains(&(Coord::new(3, 4), Direction::Up)));
        assert!(
            plan.patches()
                .iter()
                .all(|&(q, dir, _)| !plan.rays().contains(&(q, dir)))
        );
    }

    #[test]
    fn test_commit_matches_rebuild_after_quiet_move() {
        let mut grid = Grid::initial();
        let mut index = ActionIndex::build(&grid);
        commit(&mut grid, &mut index, Coord::new(2, 4), Coord::new(2, 1));
        assert_eq!(index, ActionIndex::build(&grid));
    }

    #[test]
    fn test_commit_matches_rebuild_after_capture() {
        let mut grid = Grid::initial();
        let mut index = ActionIndex::build(&grid);
        commit(&mut grid, &mut index, Coord::new(3, 4), Coord::new(3, 1));
        assert_eq!(index, ActionIndex::build(&grid));

        // e3 の守り方は e2 の陣地との間で挟まれる
        let mv = commit(&mut grid, &mut index, Coord::new(3, 8), Coord::new(3, 4));
        assert_eq!(
            mv.captures.as_slice(),
            &[Capture::new(Piece::Defender, Coord::new(2, 4))]
        );
        assert!(!grid.is_occupied(Coord::new(2, 4)));
        assert!(index.matches_occupancy(&grid));
        assert_eq!(index, ActionIndex::build(&grid));
    }

    #[test]
    fn test_replay_leaves_index_untouched() {
        struct Counter(usize);
        impl RepairSink for Counter {
            fn vacated(&mut self, _: Coord, _: Option<&Rays>) {
                self.0 += 1;
            }
            fn ray_replaced(&mut self, _: Coord, _: Direction, _: &[Move], _: &[Move]) {
                self.0 += 1;
            }
            fn captures_changed(&mut self, _: &Move, _: &Captures) {
                self.0 += 1;
            }
        }

        let mut grid = Grid::initial();
        let index = ActionIndex::build(&grid);
        let before = index.clone();
        let mv = index.find(Coord::new(2, 4), Coord::new(2, 1)).cloned().unwrap();
        play(&mut grid, &mv);
        let plan = RepairPlan::build(&grid, &index, &changed_cells(&mv));
        let mut counter = Counter(0);
        plan.replay(&grid, &index, &mut counter);
        assert_eq!(index, before);
        assert!(counter.0 >= plan.vacated().len() + plan.rays().len());
    }
}
