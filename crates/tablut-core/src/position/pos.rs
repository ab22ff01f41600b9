//! 局面（Position）
//!
//! 盤面・指し手インデックス・手番・駒数・終局状態・千日手履歴をまとめて持つ。
//! 確定手は `apply`、評価時の試行は `simulate` / `undo`（盤面のみ）で扱う。

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::{Cell, geometry};
use crate::error::{ParseError, PositionError};
use crate::threat::{CaptureThreatMap, DryRun, DryRunReport};
use crate::types::{Coord, Move, Piece, Side};

use super::Grid;
use super::action_index::ActionIndex;
use super::repair::{RepairPlan, changed_cells};

/// 終局の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    AttackersWon,
    DefendersWon,
    Draw,
}

impl Outcome {
    /// 勝った陣営（引き分けなら None）
    pub const fn winner(self) -> Option<Side> {
        match self {
            Outcome::AttackersWon => Some(Side::Attacker),
            Outcome::DefendersWon => Some(Side::Defender),
            Outcome::Draw => None,
        }
    }

    const fn won_by(side: Side) -> Outcome {
        match side {
            Side::Attacker => Outcome::AttackersWon,
            Side::Defender => Outcome::DefendersWon,
        }
    }
}

/// 終局理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// 王が脱出升に到達した
    KingEscaped,
    /// 王が取られた（盤上に王がいない）
    KingCaptured,
    /// 攻め方の駒がなくなった
    AttackersExhausted,
    /// 手番側に合法手がない
    NoLegalMoves,
    /// 同一配置の再現
    Repetition,
}

/// 終局状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameResult {
    pub outcome: Outcome,
    pub reason: Termination,
}

/// 局面
#[derive(Debug, Clone)]
pub struct Position {
    grid: Grid,
    index: ActionIndex,
    side_to_move: Side,
    king: Option<Coord>,
    attackers: usize,
    /// 王を除く守り方の数
    defenders: usize,
    result: Option<GameResult>,
    /// 最後の取り以降の配置（現局面を含む）
    history: Vec<Grid>,
    ply: u32,
    /// 定跡を使える局面か（平手初期配置・守り方先手のみ）
    book: bool,
    opening: Option<Move>,
    previous: Option<Move>,
    /// `simulate` 中の手
    pending: Option<Move>,
}

impl Position {
    /// 平手初期局面（守り方先手）
    pub fn new() -> Self {
        Position::with_first_player(Side::Defender)
    }

    /// 平手初期局面を指定の手番で開始する
    pub fn with_first_player(side: Side) -> Self {
        let grid = Grid::initial();
        Position {
            index: ActionIndex::build(&grid),
            side_to_move: side,
            king: Some(Coord::CENTER),
            attackers: grid.count(Piece::Attacker),
            defenders: grid.count(Piece::Defender),
            result: None,
            history: vec![grid],
            ply: 0,
            book: side == Side::Defender,
            opening: None,
            previous: None,
            pending: None,
            grid,
        }
    }

    /// 任意の配置から再開する
    ///
    /// 王の位置と駒数は走査で求め、インデックスは全構築する。定跡は使わない。
    pub fn from_grid(grid: Grid, side: Side) -> Result<Self, PositionError> {
        let mut king = None;
        for (c, piece) in grid.occupied() {
            if piece.is_king() {
                if let Some(first) = king {
                    return Err(PositionError::MultipleKings(first, c));
                }
                king = Some(c);
            } else if geometry().is(c, Cell::Citadel) {
                return Err(PositionError::PieceOnCitadel(c));
            }
        }

        let mut pos = Position {
            index: ActionIndex::build(&grid),
            side_to_move: side,
            king,
            attackers: grid.count(Piece::Attacker),
            defenders: grid.count(Piece::Defender),
            result: None,
            history: vec![grid],
            ply: 0,
            book: false,
            opening: None,
            previous: None,
            pending: None,
            grid,
        };
        match king {
            None => pos.finish(Outcome::AttackersWon, Termination::KingCaptured),
            Some(k) if geometry().is(k, Cell::Escape) => {
                pos.finish(Outcome::DefendersWon, Termination::KingEscaped)
            }
            Some(_) if pos.attackers == 0 => {
                pos.finish(Outcome::DefendersWon, Termination::AttackersExhausted)
            }
            Some(_) => pos.check_stalemate(),
        }
        Ok(pos)
    }

    /// 盤面文字列から再開する
    pub fn parse(text: &str, side: Side) -> Result<Self, PositionError> {
        let grid: Grid = text.parse()?;
        Position::from_grid(grid, side)
    }

    // ------------------------------------------------------------------
    // 参照
    // ------------------------------------------------------------------

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn index(&self) -> &ActionIndex {
        &self.index
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    #[inline]
    pub fn king(&self) -> Option<Coord> {
        self.king
    }

    #[inline]
    pub fn attackers(&self) -> usize {
        self.attackers
    }

    #[inline]
    pub fn defenders(&self) -> usize {
        self.defenders
    }

    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.result.map(|r| r.outcome)
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.result.is_some()
    }

    pub fn attackers_won(&self) -> bool {
        self.outcome() == Some(Outcome::AttackersWon)
    }

    pub fn defenders_won(&self) -> bool {
        self.outcome() == Some(Outcome::DefendersWon)
    }

    pub fn is_draw(&self) -> bool {
        self.outcome() == Some(Outcome::Draw)
    }

    /// 確定した手数
    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// 1手目
    pub fn opening(&self) -> Option<&Move> {
        self.opening.as_ref()
    }

    /// 直前の手
    pub fn previous(&self) -> Option<&Move> {
        self.previous.as_ref()
    }

    /// 定跡を引ける局面か
    pub fn book_enabled(&self) -> bool {
        self.book && self.ply < 2
    }

    /// 最後の取り以降の配置履歴
    pub fn history(&self) -> &[Grid] {
        &self.history
    }

    /// 王の4方向の移動可能数
    pub fn king_paths(&self) -> [usize; 4] {
        self.king.map_or([0; 4], |k| self.index.ray_lengths(k))
    }

    // ------------------------------------------------------------------
    // 合法手
    // ------------------------------------------------------------------

    /// 手番側の合法手。終局後は空。
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.legal_moves_for(self.side_to_move)
    }

    /// 指定陣営の合法手（終局判定はしない）
    pub fn legal_moves_for(&self, side: Side) -> Vec<Move> {
        self.index.moves_for(&self.grid, side)
    }

    /// 手番側の合法手から `from` → `to` を探す
    pub fn find_move(&self, from: Coord, to: Coord) -> Option<Move> {
        if self.is_terminal() || self.grid.get(from).side() != Some(self.side_to_move) {
            return None;
        }
        self.index.find(from, to).cloned()
    }

    /// `e3-b3` 形式の指し手を合法手に解決する（取り表記 `x..` は無視する）
    pub fn parse_move(&self, text: &str) -> Result<Move, ParseError> {
        let invalid = || ParseError::InvalidMove(text.to_string());
        let body = text.trim().split('x').next().unwrap_or_default();
        let (from, to) = body.split_once('-').ok_or_else(invalid)?;
        let from: Coord = from.parse()?;
        let to: Coord = to.parse()?;
        self.find_move(from, to).ok_or_else(invalid)
    }

    // ------------------------------------------------------------------
    // 確定手
    // ------------------------------------------------------------------

    /// 手を確定する
    ///
    /// `mv` は現局面の合法手であること。終局後や `simulate` 中の呼び出しは契約違反。
    pub fn apply(&mut self, mv: &Move) {
        assert!(self.result.is_none(), "apply on a finished game: {mv}");
        assert!(
            self.pending.is_none(),
            "apply while a simulated move is outstanding: {mv}"
        );
        debug_assert_eq!(self.grid.get(mv.from), mv.piece, "stale move {mv}");
        debug_assert_eq!(mv.piece.side(), Some(self.side_to_move), "wrong side {mv}");

        let mover = self.side_to_move;
        self.grid.set(mv.from, Piece::Empty);
        self.grid.set(mv.to, mv.piece);
        for cap in &mv.captures {
            self.grid.set(cap.at, Piece::Empty);
            match cap.piece {
                Piece::Attacker => self.attackers -= 1,
                Piece::Defender => self.defenders -= 1,
                Piece::King => self.king = None,
                Piece::Empty => {}
            }
        }
        if mv.piece.is_king() {
            self.king = Some(mv.to);
        }

        if mv.piece.is_king() && geometry().is(mv.to, Cell::Escape) {
            self.finish(Outcome::DefendersWon, Termination::KingEscaped);
        } else if mv.captures_king() {
            self.finish(Outcome::AttackersWon, Termination::KingCaptured);
        } else if self.attackers == 0 {
            self.finish(Outcome::DefendersWon, Termination::AttackersExhausted);
        }

        if mv.is_capture() {
            self.history.clear();
        } else if self.result.is_none() && self.history.contains(&self.grid) {
            self.finish(Outcome::Draw, Termination::Repetition);
        }
        self.history.push(self.grid);

        let plan = RepairPlan::build(&self.grid, &self.index, &changed_cells(mv));
        trace!(
            "repair {mv}: vacated={:?} rays={} patches={}",
            plan.vacated(),
            plan.rays().len(),
            plan.patches().len()
        );
        plan.commit(&self.grid, &mut self.index);

        if self.ply == 0 {
            self.opening = Some(mv.clone());
        }
        self.previous = Some(mv.clone());
        self.ply += 1;
        self.side_to_move = !mover;

        if self.result.is_none() {
            self.check_stalemate();
        }
        debug!(
            "ply {} {} {mv} (attackers={}, defenders={}, result={:?})",
            self.ply,
            mover.label(),
            self.attackers,
            self.defenders,
            self.result
        );
    }

    /// 手番側に合法手がなければ相手の勝ち
    fn check_stalemate(&mut self) {
        if !self.index.has_moves_for(&self.grid, self.side_to_move) {
            self.finish(
                Outcome::won_by(self.side_to_move.opponent()),
                Termination::NoLegalMoves,
            );
        }
    }

    fn finish(&mut self, outcome: Outcome, reason: Termination) {
        debug_assert!(self.result.is_none());
        self.result = Some(GameResult { outcome, reason });
    }

    // ------------------------------------------------------------------
    // 試行（盤面のみ）
    // ------------------------------------------------------------------

    /// 盤面だけに手を反映する。必ず同じ手で `undo` すること。
    pub fn simulate(&mut self, mv: &Move) {
        assert!(
            self.pending.is_none(),
            "simulate while another simulated move is outstanding: {mv}"
        );
        self.grid.set(mv.from, Piece::Empty);
        self.grid.set(mv.to, mv.piece);
        for cap in &mv.captures {
            self.grid.set(cap.at, Piece::Empty);
        }
        self.pending = Some(mv.clone());
    }

    /// `simulate` を取り消す
    pub fn undo(&mut self, mv: &Move) {
        match &self.pending {
            Some(p) if p == mv => {}
            Some(p) => panic!("undo {mv} does not match simulated move {p}"),
            None => panic!("undo {mv} without a simulated move"),
        }
        self.grid.set(mv.to, Piece::Empty);
        self.grid.set(mv.from, mv.piece);
        for cap in &mv.captures {
            self.grid.set(cap.at, cap.piece);
        }
        self.pending = None;
    }

    /// `simulate` 中か
    pub fn is_simulating(&self) -> bool {
        self.pending.is_some()
    }

    /// `mv` を試行した盤面で `f` を呼ぶ
    pub fn with_simulated<R>(&mut self, mv: &Move, f: impl FnOnce(&Position) -> R) -> R {
        self.simulate(mv);
        let r = f(self);
        self.undo(mv);
        r
    }

    /// 試行中の手の差分を `baseline` の影で集計する
    ///
    /// インデックスも `baseline` も変更しない。
    pub fn dry_run(&self, baseline: &CaptureThreatMap) -> DryRunReport {
        let Some(mv) = &self.pending else {
            panic!("dry_run without a simulated move");
        };
        let king_after = if mv.piece.is_king() {
            Some(mv.to)
        } else if mv.captures_king() {
            None
        } else {
            self.king
        };
        let plan = RepairPlan::build(&self.grid, &self.index, &changed_cells(mv));
        let mut sink = DryRun::new(baseline, &self.index, king_after);
        plan.replay(&self.grid, &self.index, &mut sink);
        sink.finish()
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid)?;
        write!(
            f,
            "{} to move, ply {}, attackers {}, defenders {}",
            self.side_to_move.label(),
            self.ply,
            self.attackers,
            self.defenders
        )?;
        if let Some(result) = self.result {
            write!(f, ", {:?} ({:?})", result.outcome, result.reason)?;
        }
        Ok(())
    }
}
