use serde::{Deserialize, Serialize};
use tablut_core::{Outcome, Side, Termination};

/// 指し手の選び方
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// 順位付けの先頭の手
    Greedy,
    /// 候補手の重みに比例して抽選
    Stochastic,
}

/// 1局分の結果（JSON Lines の1行）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game: u32,
    pub first_player: String,
    pub outcome: Outcome,
    pub reason: String,
    pub plies: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// 全対局の集計
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub games: u32,
    pub attackers_won: u32,
    pub defenders_won: u32,
    pub draws: u32,
    pub total_plies: u64,
}

impl GameSummary {
    pub fn record(&mut self, rec: &GameRecord) {
        self.games += 1;
        self.total_plies += u64::from(rec.plies);
        match rec.outcome {
            Outcome::AttackersWon => self.attackers_won += 1,
            Outcome::DefendersWon => self.defenders_won += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn average_plies(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_plies as f64 / f64::from(self.games)
        }
    }
}

pub fn side_label(side: Side) -> char {
    match side {
        Side::Attacker => 'a',
        Side::Defender => 'd',
    }
}

/// 終局理由のラベル（手数上限は `max_plies`）
pub fn termination_label(reason: Termination) -> &'static str {
    match reason {
        Termination::KingEscaped => "king_escaped",
        Termination::KingCaptured => "king_captured",
        Termination::AttackersExhausted => "attackers_exhausted",
        Termination::NoLegalMoves => "no_legal_moves",
        Termination::Repetition => "repetition",
    }
}
