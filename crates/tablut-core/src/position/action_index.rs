//! 指し手インデックス（ActionIndex）
//!
//! 駒のある升ごとに、4方向それぞれの指し手列（近い順）を保持する。
//! エントリは升に駒があるときに限り存在する。

use crate::types::{Coord, Direction, Move, Side};

use super::Grid;
use super::rules::generate_ray;

/// 1升分の指し手列（Up, Right, Down, Left の順）
pub type Rays = [Vec<Move>; Direction::NUM];

/// 駒のある升 → 4方向の指し手列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionIndex {
    entries: Vec<Option<Rays>>,
}

impl ActionIndex {
    /// 盤面全体から構築する
    pub fn build(grid: &Grid) -> Self {
        let mut entries: Vec<Option<Rays>> = vec![None; Coord::NUM];
        for (c, _) in grid.occupied() {
            entries[c.index()] = Some(generate_rays(grid, c));
        }
        ActionIndex { entries }
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.entries[c.index()].is_some()
    }

    #[inline]
    pub fn rays(&self, c: Coord) -> Option<&Rays> {
        self.entries[c.index()].as_ref()
    }

    /// 指定方向の指し手列（エントリがなければ空）
    #[inline]
    pub fn ray(&self, c: Coord, dir: Direction) -> &[Move] {
        match &self.entries[c.index()] {
            Some(rays) => &rays[dir.index()],
            None => &[],
        }
    }

    pub(crate) fn ray_mut(&mut self, c: Coord, dir: Direction) -> Option<&mut Vec<Move>> {
        self.entries[c.index()]
            .as_mut()
            .map(|rays| &mut rays[dir.index()])
    }

    /// 1方向の指し手列を差し替える。エントリがなければ作る。
    pub(crate) fn set_ray(&mut self, c: Coord, dir: Direction, moves: Vec<Move>) {
        let rays = self.entries[c.index()].get_or_insert_with(Default::default);
        rays[dir.index()] = moves;
    }

    pub(crate) fn remove(&mut self, c: Coord) -> Option<Rays> {
        self.entries[c.index()].take()
    }

    /// `from` から `to` へ着地する登録済みの指し手
    pub fn find(&self, from: Coord, to: Coord) -> Option<&Move> {
        let dir = from.direction_to(to)?;
        self.ray(from, dir).iter().find(|m| m.to == to)
    }

    /// 登録済みの升（行優先）
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|_| Coord::from_index(i)))
    }

    /// 登録済みの全指し手
    pub fn iter(&self) -> impl Iterator<Item = &Move> + '_ {
        self.entries.iter().flatten().flat_map(|rays| rays.iter().flatten())
    }

    /// 指定陣営の指し手（升は行優先、方向は Up, Right, Down, Left、各方向は近い順）
    pub fn moves_for(&self, grid: &Grid, side: Side) -> Vec<Move> {
        self.moves_for_iter(grid, side).cloned().collect()
    }

    pub fn has_moves_for(&self, grid: &Grid, side: Side) -> bool {
        self.moves_for_iter(grid, side).next().is_some()
    }

    fn moves_for_iter<'a>(&'a self, grid: &'a Grid, side: Side) -> impl Iterator<Item = &'a Move> + 'a {
        self.cells()
            .filter(move |&c| grid.get(c).side() == Some(side))
            .flat_map(move |c| self.ray_iter(c))
    }

    fn ray_iter(&self, c: Coord) -> impl Iterator<Item = &Move> + '_ {
        self.rays(c).into_iter().flat_map(|rays| rays.iter().flatten())
    }

    /// 王の4方向の移動可能数
    pub fn ray_lengths(&self, c: Coord) -> [usize; Direction::NUM] {
        let mut lens = [0; Direction::NUM];
        if let Some(rays) = self.rays(c) {
            for (len, ray) in lens.iter_mut().zip(rays) {
                *len = ray.len();
            }
        }
        lens
    }

    /// エントリ数
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// エントリの有無が盤面の駒の有無と一致しているか
    pub fn matches_occupancy(&self, grid: &Grid) -> bool {
        Coord::all().all(|c| self.contains(c) == grid.is_occupied(c))
    }
}

/// `c` の駒の4方向すべての指し手列
pub fn generate_rays(grid: &Grid, c: Coord) -> Rays {
    Direction::ALL.map(|dir| generate_ray(grid, c, dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Piece;

    #[test]
    fn test_build_initial() {
        let grid = Grid::initial();
        let index = ActionIndex::build(&grid);
        assert_eq!(index.len(), 25);
        assert!(index.matches_occupancy(&grid));
        assert!(!index.contains(Coord::new(3, 5)));
        assert!(index.contains(Coord::CENTER));
    }

    #[test]
    fn test_initial_move_counts() {
        let grid = Grid::initial();
        let index = ActionIndex::build(&grid);
        // 王は四方を守り方に囲まれている
        assert_eq!(index.ray_lengths(Coord::CENTER), [0, 0, 0, 0]);
        let defender = index.moves_for(&grid, Side::Defender);
        // e3/e7/c5/g5 は左右に4升ずつ、e4/e6/d5/f5 は左右に3升ずつ
        assert_eq!(defender.len(), 4 * 8 + 4 * 6);
        assert!(defender.iter().all(|m| m.piece != Piece::Attacker));
        assert!(index.has_moves_for(&grid, Side::Attacker));
    }

    #[test]
    fn test_find() {
        let grid = Grid::initial();
        let index = ActionIndex::build(&grid);
        let mv = index.find(Coord::new(2, 4), Coord::new(2, 1)).unwrap();
        assert_eq!(mv.piece, Piece::Defender);
        assert!(index.find(Coord::new(2, 4), Coord::new(1, 4)).is_none());
        assert!(index.find(Coord::new(2, 4), Coord::new(3, 3)).is_none());
    }

    #[test]
    fn test_set_ray_and_remove() {
        let grid = Grid::initial();
        let mut index = ActionIndex::build(&grid);
        let c = Coord::new(2, 2);
        assert!(!index.contains(c));
        index.set_ray(c, Direction::Up, Vec::new());
        assert!(index.contains(c));
        assert!(index.remove(c).is_some());
        assert!(!index.contains(c));
        assert!(index.ray(c, Direction::Up).is_empty());
    }
}
