use anyhow::{Result, bail};
use log::debug;
use rand::Rng;
use tablut_core::eval::sample;
use tablut_core::{Evaluator, Move, Outcome, Position, Side};

use super::types::{GameRecord, Policy, termination_label};

/// ゲーム設定
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    /// この手数に達したら引き分け
    pub max_plies: u32,
    pub policy: Policy,
    pub first_player: Side,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            max_plies: 500,
            policy: Policy::Greedy,
            first_player: Side::Defender,
        }
    }
}

/// 1手ごとに呼ばれるイベント（適用前の局面で通知）
pub struct MoveEvent<'a> {
    pub game: u32,
    pub ply: u32,
    pub side: Side,
    pub mv: &'a Move,
    pub position: &'a Position,
}

fn choose_move<R: Rng + ?Sized>(
    evaluator: &Evaluator,
    pos: &mut Position,
    policy: Policy,
    rng: &mut R,
) -> Option<Move> {
    match policy {
        Policy::Greedy => evaluator.best_move(pos),
        Policy::Stochastic => {
            let candidates = evaluator.candidates(pos);
            sample(&candidates, rng).map(|c| c.mv.clone())
        }
    }
}

/// 1局を実行する。
///
/// - `attacker`, `defender`: 各陣営の評価器
/// - `config`: ゲーム設定
/// - `rng`: 確率的な方策で使う乱数（貪欲な方策では使わない）
/// - `game_id`: ゲーム番号
/// - `on_move`: 1手ごとに呼ばれるコールバック
pub fn run_game<R: Rng + ?Sized>(
    attacker: &Evaluator,
    defender: &Evaluator,
    config: &GameConfig,
    rng: &mut R,
    game_id: u32,
    on_move: &mut dyn FnMut(&MoveEvent<'_>),
) -> Result<GameRecord> {
    let mut pos = Position::with_first_player(config.first_player);

    while !pos.is_terminal() && pos.ply() < config.max_plies {
        let side = pos.side_to_move();
        let evaluator = match side {
            Side::Attacker => attacker,
            Side::Defender => defender,
        };
        let Some(mv) = choose_move(evaluator, &mut pos, config.policy, rng) else {
            bail!("game {game_id}: no move for {} at ply {}", side.label(), pos.ply());
        };
        debug!("game {game_id} ply {} {} {mv} score={:.3}", pos.ply() + 1, side.label(), mv.score);
        on_move(&MoveEvent {
            game: game_id,
            ply: pos.ply() + 1,
            side,
            mv: &mv,
            position: &pos,
        });
        pos.apply(&mv);
    }

    let (outcome, reason) = match pos.result() {
        Some(result) => (result.outcome, termination_label(result.reason)),
        None => (Outcome::Draw, "max_plies"),
    };
    Ok(GameRecord {
        game: game_id,
        first_player: config.first_player.label().to_string(),
        outcome,
        reason: reason.to_string(),
        plies: pos.ply(),
        seed: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn play(config: &GameConfig, seed: u64) -> (GameRecord, Vec<String>) {
        let evaluator = Evaluator::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut moves = Vec::new();
        let rec = run_game(&evaluator, &evaluator, config, &mut rng, 1, &mut |ev| {
            moves.push(ev.mv.to_string());
        })
        .unwrap();
        (rec, moves)
    }

    #[test]
    fn test_zero_plies_is_draw() {
        let config = GameConfig {
            max_plies: 0,
            ..GameConfig::default()
        };
        let (rec, moves) = play(&config, 0);
        assert_eq!(rec.outcome, Outcome::Draw);
        assert_eq!(rec.reason, "max_plies");
        assert_eq!(rec.plies, 0);
        assert!(moves.is_empty());
    }

    #[test]
    fn test_greedy_game_starts_with_book() {
        let config = GameConfig {
            max_plies: 30,
            ..GameConfig::default()
        };
        let (rec, moves) = play(&config, 0);
        assert!(rec.plies <= 30);
        assert_eq!(moves.len(), rec.plies as usize);
        assert!(moves[0].starts_with("e3-b3"), "{}", moves[0]);
        if rec.reason == "max_plies" {
            assert_eq!(rec.outcome, Outcome::Draw);
            assert_eq!(rec.plies, 30);
        }
        // 貪欲な方策は乱数を使わない
        let (again, moves_again) = play(&config, 99);
        assert_eq!(rec, again);
        assert_eq!(moves, moves_again);
    }

    #[test]
    fn test_stochastic_game_is_reproducible() {
        let config = GameConfig {
            max_plies: 30,
            policy: Policy::Stochastic,
            first_player: Side::Attacker,
        };
        let (a, moves_a) = play(&config, 5);
        let (b, moves_b) = play(&config, 5);
        assert_eq!(a, b);
        assert_eq!(moves_a, moves_b);
        assert_eq!(a.first_player, "attacker");
        assert_eq!(moves_a.len(), a.plies as usize);
    }
}
