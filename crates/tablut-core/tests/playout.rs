//! ランダムな対局でインデックスの差分更新と試行の整合性を確かめる

use proptest::prelude::*;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_xoshiro::Xoshiro256PlusPlus;
use tablut_core::position::ActionIndex;
use tablut_core::threat::CaptureThreatMap;
use tablut_core::{Coord, Piece, Position, Side};

/// 升順に並べた (取られる升, 実行できる駒の升) の一覧
fn normalized(map: &CaptureThreatMap) -> Vec<(Coord, Piece, Vec<Coord>)> {
    let mut entries: Vec<_> = map
        .iter()
        .map(|(cap, from)| {
            let mut from = from.to_vec();
            from.sort();
            (cap.at, cap.piece, from)
        })
        .collect();
    entries.sort_by_key(|(at, _, from)| (*at, from.clone()));
    entries
}

fn start(attacker_first: bool) -> Position {
    if attacker_first {
        Position::with_first_player(Side::Attacker)
    } else {
        Position::new()
    }
}

fn check_consistent(pos: &Position) -> Result<(), TestCaseError> {
    let grid = pos.grid();
    prop_assert_eq!(pos.index(), &ActionIndex::build(grid));
    prop_assert!(pos.index().matches_occupancy(grid));
    prop_assert_eq!(pos.attackers(), grid.count(Piece::Attacker));
    prop_assert_eq!(pos.defenders(), grid.count(Piece::Defender));
    prop_assert_eq!(pos.king(), grid.find_king());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_incremental_index_matches_rebuild(
        seed in any::<u64>(),
        attacker_first in any::<bool>(),
        plies in 1usize..120,
    ) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut pos = start(attacker_first);
        for _ in 0..plies {
            let moves = pos.legal_moves();
            let Some(mv) = moves.choose(&mut rng) else {
                break;
            };
            pos.apply(mv);
            check_consistent(&pos)?;
        }
    }

    #[test]
    fn test_dry_run_matches_applied_threats(
        seed in any::<u64>(),
        attacker_first in any::<bool>(),
        plies in 1usize..60,
    ) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut pos = start(attacker_first);
        for _ in 0..plies {
            let moves = pos.legal_moves();
            let Some(mv) = moves.choose(&mut rng).cloned() else {
                break;
            };
            let baseline = CaptureThreatMap::build(pos.index());
            let report = pos.with_simulated(&mv, |sim| sim.dry_run(&baseline));

            let mut after = pos.clone();
            after.apply(&mv);
            let expected = CaptureThreatMap::build(after.index());
            prop_assert_eq!(normalized(&report.threats), normalized(&expected));
            prop_assert_eq!(report.king_paths, after.king_paths());

            // 指し手数の増減はインデックス全体の差に一致する
            let moves_before = pos.index().iter().count() as i64;
            let moves_after = after.index().iter().count() as i64;
            prop_assert_eq!(
                report.moves_gained as i64 - report.moves_lost as i64,
                moves_after - moves_before
            );
            // 取りの出現・消滅は基準と適用後のキーの差集合
            let gained = expected.iter().filter(|(cap, _)| !baseline.contains(cap)).count();
            let lost = baseline.iter().filter(|(cap, _)| !expected.contains(cap)).count();
            prop_assert_eq!((report.captures_gained, report.captures_lost), (gained, lost));
            // 基準のマップは変わらない
            prop_assert_eq!(normalized(&baseline), normalized(&CaptureThreatMap::build(pos.index())));

            pos = after;
        }
    }

    #[test]
    fn test_simulate_matches_apply_and_undo_restores(
        seed in any::<u64>(),
        plies in 1usize..60,
    ) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut pos = Position::with_first_player(Side::Attacker);
        for _ in 0..plies {
            let moves = pos.legal_moves();
            let Some(mv) = moves.choose(&mut rng).cloned() else {
                break;
            };
            let before = *pos.grid();
            let index_before = pos.index().clone();

            pos.simulate(&mv);
            let simulated = *pos.grid();
            pos.undo(&mv);
            prop_assert_eq!(pos.grid(), &before);
            prop_assert_eq!(pos.index(), &index_before);

            pos.apply(&mv);
            prop_assert_eq!(pos.grid(), &simulated);
        }
    }
}

#[test]
fn test_piece_counts_only_decrease() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(2024);
    for _ in 0..8 {
        let mut pos = Position::with_first_player(Side::Attacker);
        let (mut attackers, mut defenders) = (pos.attackers(), pos.defenders());
        while !pos.is_terminal() && pos.ply() < 200 {
            let moves = pos.legal_moves();
            let mv = moves.choose(&mut rng).cloned().unwrap();
            pos.apply(&mv);
            assert!(pos.attackers() <= attackers);
            assert!(pos.defenders() <= defenders);
            assert_eq!(
                attackers + defenders - pos.attackers() - pos.defenders(),
                mv.captures.iter().filter(|c| c.piece != Piece::King).count()
            );
            attackers = pos.attackers();
            defenders = pos.defenders();
        }
    }
}
