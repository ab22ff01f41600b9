//! 定跡の1手目・2手目を実際の局面で確かめる

use tablut_core::opening_book::lookup;
use tablut_core::{Capture, Coord, Evaluator, Piece, Position, Side};

fn apply(pos: &mut Position, from: Coord, to: Coord) {
    let mv = pos.find_move(from, to).unwrap();
    pos.apply(&mv);
}

#[test]
fn test_first_two_book_moves() {
    let evaluator = Evaluator::default();
    let mut pos = Position::new();

    let first = evaluator.best_move(&mut pos).unwrap();
    assert_eq!(first.to_string(), "e3-b3");
    pos.apply(&first);

    let reply = evaluator.rank(&mut pos);
    assert_eq!(reply.len(), 1);
    assert_eq!((reply[0].from, reply[0].to), (Coord::new(0, 5), Coord::new(2, 5)));
    pos.apply(&reply[0]);

    // 3手目からは定跡を使わない
    assert!(lookup(&pos).is_none());
    assert!(!evaluator.rank(&mut pos).is_empty());
}

#[test]
fn test_book_reply_resolves_captures_on_live_board() {
    let evaluator = Evaluator::default();
    let mut pos = Position::new();
    apply(&mut pos, Coord::new(3, 4), Coord::new(3, 1));

    let reply = evaluator.best_move(&mut pos).unwrap();
    assert_eq!((reply.from, reply.to), (Coord::new(3, 8), Coord::new(3, 4)));
    // e3 の守り方は陣地 e2 との間で挟まれる
    assert_eq!(
        reply.captures.as_slice(),
        &[Capture::new(Piece::Defender, Coord::new(2, 4))]
    );
    pos.apply(&reply);
    assert_eq!(pos.defenders(), 7);
}

#[test]
fn test_book_reply_through_rotation() {
    let evaluator = Evaluator::default();
    let mut pos = Position::new();
    apply(&mut pos, Coord::new(5, 4), Coord::new(5, 7));

    let reply = evaluator.best_move(&mut pos).unwrap();
    assert_eq!((reply.from, reply.to), (Coord::new(5, 0), Coord::new(5, 4)));
    assert_eq!(
        reply.captures.as_slice(),
        &[Capture::new(Piece::Defender, Coord::new(6, 4))]
    );
}

#[test]
fn test_attacker_first_game_has_no_book() {
    let evaluator = Evaluator::default();
    let pos = Position::with_first_player(Side::Attacker);
    assert!(!pos.book_enabled());
    assert!(lookup(&pos).is_none());
    assert_eq!(evaluator.candidates(&pos).len(), pos.legal_moves().len());
}
