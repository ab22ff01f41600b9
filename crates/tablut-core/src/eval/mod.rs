//! 指し手評価
//!
//! 1手読みの貪欲な順位付けを行う。各候補手を盤面上で試行し、指し手インデックスの
//! 差分（`RepairPlan::replay`）を影の脅威マップに流して取りの増減・王の移動可能数・
//! 王の脱出の両取りを調べ、重みベクトルで1つのスコアにまとめる。
//!
//! 次の手はスコアを付けずに単独で返す。
//! - 即勝ちの手（王を取る、王が脱出する、最後の攻め方を取る）
//! - 攻め方の手番で王が1手で脱出できるとき、その経路を塞ぐ手

mod policy;

pub use policy::{CAPTURE_LIKELIHOOD, Candidate, FORCED_LIKELIHOOD, QUIET_LIKELIHOOD, sample};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::{Cell, geometry};
use crate::mate::{blocks_path, escape_targets, king_checkmate};
use crate::opening_book;
use crate::position::Position;
use crate::threat::CaptureThreatMap;
use crate::types::{Move, Piece, Side};

/// 評価の重み
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// 取りの増減（自分の取り − 相手の取り）
    pub total_diff: f64,
    /// その手で実際に取る駒の数
    pub active_captures: f64,
    /// 王の移動可能数の増減（攻め方は符号反転）
    pub king_mobility_diff: f64,
    /// 着地した駒が取られうる
    pub will_be_captured: f64,
    /// 王の脱出の両取り
    pub king_checkmate: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            total_diff: 3.0,
            active_captures: 2.0,
            king_mobility_diff: 1.0,
            will_be_captured: 4.0,
            king_checkmate: 10.0,
        }
    }
}

/// 手番側から見た取りの重み
const fn capture_weight(side: Side) -> f64 {
    match side {
        Side::Attacker => 2.0 / 3.0,
        Side::Defender => 1.0 / 3.0,
    }
}

/// 王の移動可能数の符号
const fn king_sign(side: Side) -> f64 {
    match side {
        Side::Attacker => -1.0,
        Side::Defender => 1.0,
    }
}

/// 現局面の基準値
struct Baseline {
    threats: CaptureThreatMap,
    captures: i64,
    loss: i64,
    king_moves: i64,
}

impl Baseline {
    fn new(pos: &Position) -> Self {
        let threats = CaptureThreatMap::build(pos.index());
        let side = pos.side_to_move();
        let captures = threats.count_for(side) as i64;
        let loss = threats.count_against(side) as i64;
        let king_moves = pos.king_paths().iter().sum::<usize>() as i64;
        Baseline {
            threats,
            captures,
            loss,
            king_moves,
        }
    }
}

/// 評価器
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    weights: Weights,
}

impl Evaluator {
    pub fn new(weights: Weights) -> Self {
        Evaluator { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// 手番側の合法手を順位付けする
    ///
    /// 定跡手・即勝ち・脱出阻止の手があればそれだけを返す。それ以外は王の手
    /// （負けにならないもの）を生成順で先頭に、残りをスコア降順で並べ、負のスコアは除く。
    /// 何も残らなければ全合法手を返す。終局後は空。
    pub fn rank(&self, pos: &mut Position) -> Vec<Move> {
        if pos.is_terminal() {
            return Vec::new();
        }
        if let Some(mv) = opening_book::lookup(pos) {
            return vec![mv];
        }
        let moves = pos.legal_moves();
        if let Some(forced) = forced_moves(pos, &moves) {
            return forced;
        }
        self.rank_moves(pos, moves)
    }

    /// 最善手（`rank` の先頭）
    pub fn best_move(&self, pos: &mut Position) -> Option<Move> {
        self.rank(pos).into_iter().next()
    }

    fn rank_moves(&self, pos: &mut Position, moves: Vec<Move>) -> Vec<Move> {
        if moves.is_empty() {
            return moves;
        }
        let baseline = Baseline::new(pos);
        let scored: Vec<Move> = moves
            .into_iter()
            .map(|mut mv| {
                mv.score = self.evaluate_with(pos, &mv, &baseline);
                mv
            })
            .collect();

        let mut ranked: Vec<Move> = scored
            .iter()
            .filter(|m| m.piece.is_king() && m.score >= 0.0)
            .cloned()
            .collect();
        let mut rest: Vec<Move> = scored
            .iter()
            .filter(|m| !m.piece.is_king() && m.score >= 0.0)
            .cloned()
            .collect();
        rest.sort_by(Move::rank_cmp);
        ranked.extend(rest);

        if ranked.is_empty() {
            debug!("all {} moves score negative, keeping the full list", scored.len());
            return scored;
        }
        ranked
    }

    /// 1手のスコア
    pub fn evaluate(&self, pos: &mut Position, mv: &Move) -> f64 {
        let baseline = Baseline::new(pos);
        self.evaluate_with(pos, mv, &baseline)
    }

    fn evaluate_with(&self, pos: &mut Position, mv: &Move, baseline: &Baseline) -> f64 {
        let side = pos.side_to_move();
        let king_after = if mv.piece.is_king() {
            Some(mv.to)
        } else if mv.captures_king() {
            None
        } else {
            pos.king()
        };

        let (checkmate, report) = pos.with_simulated(mv, |sim| {
            let checkmate = !mv.piece.is_king()
                && king_after.is_some_and(|k| king_checkmate(sim.grid(), k, side));
            (checkmate, sim.dry_run(&baseline.threats))
        });

        let will_be_captured = report.threats.threatens(mv.to);
        if side == Side::Attacker && checkmate {
            return -1.0;
        }
        if mv.piece.is_king() {
            return if will_be_captured { -1.0 } else { 0.0 };
        }

        let active = mv.captures.len() as i64;
        let new_captures = report.threats.count_for(side) as i64;
        let new_loss = report.threats.count_against(side) as i64;
        let captures_diff = new_captures + active - baseline.captures;
        let loss_diff = new_loss - baseline.loss;
        let total_diff = (captures_diff - loss_diff) as f64;
        let king_moves_diff = (report.king_moves() as i64 - baseline.king_moves) as f64;

        let w = &self.weights;
        capture_weight(side) * w.total_diff * total_diff
            + w.active_captures * active as f64
            + king_sign(side) * w.king_mobility_diff * king_moves_diff
            - w.will_be_captured * f64::from(u8::from(will_be_captured))
            + w.king_checkmate * f64::from(u8::from(checkmate))
    }
}

/// 即座に勝つ手か
pub fn is_win(pos: &Position, mv: &Move) -> bool {
    match mv.piece {
        Piece::Attacker => mv.captures_king(),
        Piece::King if geometry().is(mv.to, Cell::Escape) => true,
        Piece::King | Piece::Defender => pos.attackers() == mv.captures.len(),
        Piece::Empty => false,
    }
}

/// 単独で返すべき手
///
/// 即勝ちの手があればその1手。攻め方の手番で王が1手で脱出できるなら、
/// すべての脱出経路の上に着地する攻め方の手。
pub(crate) fn forced_moves(pos: &Position, moves: &[Move]) -> Option<Vec<Move>> {
    if let Some(win) = moves.iter().find(|m| is_win(pos, m)) {
        debug!("winning move {win}");
        return Some(vec![win.clone()]);
    }
    if pos.side_to_move() != Side::Attacker {
        return None;
    }
    let king = pos.king()?;
    let escapes = escape_targets(pos.grid(), king);
    if escapes.is_empty() {
        return None;
    }
    let blocks: Vec<Move> = moves
        .iter()
        .filter(|m| m.piece == Piece::Attacker)
        .filter(|m| escapes.iter().all(|&(_, target)| blocks_path(king, target, m.to)))
        .cloned()
        .collect();
    if blocks.is_empty() {
        debug!("king has {} escape routes, none blockable", escapes.len());
        return None;
    }
    debug!("{} moves block the king escape", blocks.len());
    Some(blocks)
}
