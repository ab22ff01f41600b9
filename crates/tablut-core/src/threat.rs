//! 取りの脅威マップ（CaptureThreatMap）と試行用の差分集計
//!
//! `CaptureThreatMap` は「今すぐ実行できる取り」→「それを実行できる駒の升」の多重集合。
//! 同じ駒が同じ取りを複数の指し手で実行できる場合は、その数だけ升を重複して持つ。
//! 升が1つもなくなった取りはエントリごと消える。

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use smallvec::SmallVec;

use crate::position::{ActionIndex, RepairSink, Rays};
use crate::types::{Capture, Captures, Coord, Direction, Move, Side};

type Attackers = SmallVec<[Coord; 4]>;

/// 取り → 実行可能な駒の升
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureThreatMap {
    entries: HashMap<Capture, Attackers>,
}

impl CaptureThreatMap {
    pub fn new() -> Self {
        CaptureThreatMap::default()
    }

    /// インデックスの全指し手（両陣営）から構築する
    pub fn build(index: &ActionIndex) -> Self {
        let mut map = CaptureThreatMap::new();
        for mv in index.iter() {
            map.add_all(&mv.captures, mv.from);
        }
        map
    }

    /// 追加する。新しいエントリができたら true。
    pub fn add(&mut self, capture: Capture, from: Coord) -> bool {
        match self.entries.entry(capture) {
            Entry::Occupied(mut e) => {
                e.get_mut().push(from);
                false
            }
            Entry::Vacant(e) => {
                e.insert(smallvec::smallvec![from]);
                true
            }
        }
    }

    /// 1つ取り除く。エントリが消えたら true。
    pub fn remove(&mut self, capture: &Capture, from: Coord) -> bool {
        let Some(attackers) = self.entries.get_mut(capture) else {
            return false;
        };
        if let Some(pos) = attackers.iter().position(|&c| c == from) {
            attackers.swap_remove(pos);
        }
        if attackers.is_empty() {
            self.entries.remove(capture);
            return true;
        }
        false
    }

    fn add_all(&mut self, captures: &[Capture], from: Coord) {
        for &cap in captures {
            self.add(cap, from);
        }
    }

    fn remove_all(&mut self, captures: &[Capture], from: Coord) {
        for cap in captures {
            self.remove(cap, from);
        }
    }

    pub fn contains(&self, capture: &Capture) -> bool {
        self.entries.contains_key(capture)
    }

    /// 取りを実行できる駒の升
    pub fn attackers(&self, capture: &Capture) -> &[Coord] {
        self.entries.get(capture).map_or(&[], |a| a.as_slice())
    }

    /// 取られる駒が `at` にある取りがあるか
    pub fn threatens(&self, at: Coord) -> bool {
        self.entries.keys().any(|c| c.at == at)
    }

    /// `side` が実行できる取りの数（取られる駒が相手陣営のもの）
    pub fn count_for(&self, side: Side) -> usize {
        self.entries
            .keys()
            .filter(|c| c.piece.side() == Some(side.opponent()))
            .count()
    }

    /// `side` の駒が取られうる数
    pub fn count_against(&self, side: Side) -> usize {
        self.entries
            .keys()
            .filter(|c| c.piece.side() == Some(side))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Capture, &[Coord])> + '_ {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// 試行1回分の集計結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunReport {
    /// 試行後の脅威マップ
    pub threats: CaptureThreatMap,
    pub moves_gained: usize,
    pub moves_lost: usize,
    /// 新しく現れた取り
    pub captures_gained: usize,
    /// 消えた取り
    pub captures_lost: usize,
    /// 試行後の王の4方向の移動可能数
    pub king_paths: [usize; Direction::NUM],
}

impl DryRunReport {
    pub fn king_moves(&self) -> usize {
        self.king_paths.iter().sum()
    }
}

/// 基準の脅威マップの影で差分を受け取る `RepairSink`
///
/// 評価器が候補手ごとに作り、使い終わったら `finish` で捨てる。
/// 基準のマップは参照するだけで変更しない。
pub struct DryRun<'a> {
    baseline: &'a CaptureThreatMap,
    shadow: CaptureThreatMap,
    king: Option<Coord>,
    king_paths: [usize; Direction::NUM],
    moves_gained: usize,
    moves_lost: usize,
}

impl<'a> DryRun<'a> {
    /// `king` は試行後の王の升（取られるなら None）
    pub fn new(baseline: &'a CaptureThreatMap, index: &ActionIndex, king: Option<Coord>) -> Self {
        DryRun {
            baseline,
            shadow: baseline.clone(),
            king,
            king_paths: king.map_or([0; Direction::NUM], |k| index.ray_lengths(k)),
            moves_gained: 0,
            moves_lost: 0,
        }
    }

    pub fn finish(self) -> DryRunReport {
        let captures_gained = self
            .shadow
            .entries
            .keys()
            .filter(|c| !self.baseline.contains(c))
            .count();
        let captures_lost = self
            .baseline
            .entries
            .keys()
            .filter(|c| !self.shadow.contains(c))
            .count();
        DryRunReport {
            threats: self.shadow,
            moves_gained: self.moves_gained,
            moves_lost: self.moves_lost,
            captures_gained,
            captures_lost,
            king_paths: self.king_paths,
        }
    }
}

impl RepairSink for DryRun<'_> {
    fn vacated(&mut self, at: Coord, old: Option<&Rays>) {
        let Some(rays) = old else {
            return;
        };
        for mv in rays.iter().flatten() {
            self.shadow.remove_all(&mv.captures, at);
            self.moves_lost += 1;
        }
    }

    fn ray_replaced(&mut self, from: Coord, dir: Direction, old: &[Move], new: &[Move]) {
        for mv in old {
            self.shadow.remove_all(&mv.captures, from);
        }
        for mv in new {
            self.shadow.add_all(&mv.captures, from);
        }
        if new.len() >= old.len() {
            self.moves_gained += new.len() - old.len();
        } else {
            self.moves_lost += old.len() - new.len();
        }
        if self.king == Some(from) {
            self.king_paths[dir.index()] = new.len();
        }
    }

    fn captures_changed(&mut self, mv: &Move, new: &Captures) {
        self.shadow.remove_all(&mv.captures, mv.from);
        self.shadow.add_all(new, mv.from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Grid;
    use crate::types::Piece;

    #[test]
    fn test_add_remove_multiset() {
        let mut map = CaptureThreatMap::new();
        let cap = Capture::new(Piece::Defender, Coord::new(2, 4));
        let a = Coord::new(0, 5);
        assert!(map.add(cap, a));
        assert!(!map.add(cap, a));
        assert_eq!(map.attackers(&cap), &[a, a]);
        assert!(!map.remove(&cap, a));
        assert!(map.contains(&cap));
        assert!(map.remove(&cap, a));
        assert!(!map.contains(&cap));
        assert!(map.is_empty());
        // 存在しない取りの削除は何もしない
        assert!(!map.remove(&cap, a));
    }

    #[test]
    fn test_initial_position_has_no_threats() {
        let index = ActionIndex::build(&Grid::initial());
        let map = CaptureThreatMap::build(&index);
        assert!(map.is_empty());
    }

    #[test]
    fn test_counts_by_side() {
        let grid: Grid = "\
            -----B---
            ---------
            ---------
            ---------
            ---------
            ---------
            ---BW----
            ---------
            ---------"
            .parse()
            .unwrap();
        let index = ActionIndex::build(&grid);
        let map = CaptureThreatMap::build(&index);
        // f1 の攻め方が f7 へ行くと e7 の守り方を挟める
        let cap = Capture::new(Piece::Defender, Coord::new(6, 4));
        assert!(map.contains(&cap));
        assert_eq!(map.attackers(&cap), &[Coord::new(0, 5)]);
        assert_eq!(map.count_for(Side::Attacker), 1);
        assert_eq!(map.count_against(Side::Defender), 1);
        assert!(map.threatens(Coord::new(6, 4)));
        assert_eq!(map.count_for(Side::Defender), 0);
    }
}
