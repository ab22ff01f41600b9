//! 確率付き候補手（確率的な方策用）

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::opening_book;
use crate::position::Position;
use crate::types::Move;

use super::{Evaluator, forced_moves};

/// 定跡・即勝ち・脱出阻止の手
pub const FORCED_LIKELIHOOD: f64 = 1.0;
/// 取りのある手
pub const CAPTURE_LIKELIHOOD: f64 = 0.75;
/// 取りのない手
pub const QUIET_LIKELIHOOD: f64 = 0.01;

/// 重み付きの候補手
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub mv: Move,
    pub likelihood: f64,
}

impl Candidate {
    pub fn new(mv: Move, likelihood: f64) -> Self {
        Candidate { mv, likelihood }
    }
}

impl Evaluator {
    /// 手番側の合法手に選ばれやすさを付ける
    ///
    /// 定跡手、即勝ちの手、脱出阻止の手があればそれらだけを重み1で返す。
    /// それ以外は取りのある手を重く、取りのない手を軽くする。直前に動いた駒を
    /// 取り返せる手があればその1手だけを返す。重みの降順（同じ重みは生成順）。
    pub fn candidates(&self, pos: &Position) -> Vec<Candidate> {
        if pos.is_terminal() {
            return Vec::new();
        }
        if let Some(mv) = opening_book::lookup(pos) {
            return vec![Candidate::new(mv, FORCED_LIKELIHOOD)];
        }
        let moves = pos.legal_moves();
        if let Some(forced) = forced_moves(pos, &moves) {
            return forced
                .into_iter()
                .map(|mv| Candidate::new(mv, FORCED_LIKELIHOOD))
                .collect();
        }

        let last_to = pos.previous().map(|p| p.to);
        let mut result = Vec::with_capacity(moves.len());
        for mv in moves {
            if !mv.is_capture() {
                result.push(Candidate::new(mv, QUIET_LIKELIHOOD));
                continue;
            }
            if last_to.is_some_and(|to| mv.captures.iter().any(|c| c.at == to)) {
                return vec![Candidate::new(mv, CAPTURE_LIKELIHOOD)];
            }
            result.push(Candidate::new(mv, CAPTURE_LIKELIHOOD));
        }
        result.sort_by(|a, b| b.likelihood.total_cmp(&a.likelihood));
        result
    }
}

/// 重みに比例して1つ選ぶ（空なら None）
pub fn sample<'a, R: Rng + ?Sized>(candidates: &'a [Candidate], rng: &mut R) -> Option<&'a Candidate> {
    candidates.choose_weighted(rng, |c| c.likelihood).ok()
}
