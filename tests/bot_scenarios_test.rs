//! End-to-end scenarios driven through the public `Bot` handle — §8's
//! concrete scenarios 1-3 (4 is exercised below the client boundary, in
//! `dead_position_test.rs`, and 5/6 at the `cc-eval`/`cc-core` level; see
//! `DESIGN.md`'s "Open question decisions" for why).

use cold_clear::{launch, Options, PieceKind, PollResult, Weights};

#[test]
fn fresh_launch_places_a_single_piece_flat_on_the_empty_floor() {
    let bot = launch(Options::default(), Weights::default());
    bot.add_next_piece(PieceKind::T);
    bot.request_next_move(0);

    let PollResult::Provided { mv, .. } = bot.block_next_move() else {
        panic!("expected a committed move on an empty board");
    };

    // Nothing has ever been held, so a hold branch has nothing to swap
    // into play; the only candidates are T's own placements.
    assert!(!mv.hold);
    assert!(mv.expected_y.iter().any(|&y| y == 0), "expected some cell resting on the floor, got {:?}", mv.expected_y);
    // General invariant (§8); the scenario's own "≤ 3" bound assumes a
    // hard-drop token, which `zero_g`'s single-cell-soft-drop kinematics
    // doesn't use — see DESIGN.md.
    assert!(mv.movement_count <= 32);

    bot.destroy();
}

#[test]
fn hold_exchange_resolves_to_a_well_defined_move() {
    let options = Options {
        use_hold: true,
        min_nodes: 0,
        ..Options::default()
    };
    let bot = launch(options, Weights::default());
    bot.add_next_piece(PieceKind::I);
    bot.add_next_piece(PieceKind::S);
    bot.add_next_piece(PieceKind::Z);
    bot.add_next_piece(PieceKind::L);
    bot.request_next_move(0);

    let PollResult::Provided { mv, .. } = bot.block_next_move() else {
        panic!("expected a committed move with a queue of four known pieces");
    };

    // `hold` is a plain bool fixed by commit; the meaningful claim is
    // that the request resolves at all (no deadlock) with a legal,
    // budget-respecting path regardless of which branch won.
    assert!(mv.movement_count <= 32);
    let _ = mv.hold;

    bot.destroy();
}

#[test]
fn reset_discards_the_outstanding_request_and_future_moves_reflect_the_new_board() {
    let bot = launch(Options::default(), Weights::default());
    bot.add_next_piece(PieceKind::T);
    bot.request_next_move(0);

    // A solid bottom row: nothing can land at the reset board's floor.
    let mut field = vec![false; 400];
    for col in 0..10 {
        field[col] = true;
    }
    bot.reset(&field, true, 0).unwrap();

    // The pre-reset request was discarded along with the tree it was
    // pending against (§9(a)'s full-barrier reading); a client keeps
    // playing by adding a piece and asking again.
    bot.add_next_piece(PieceKind::T);
    bot.request_next_move(0);

    let PollResult::Provided { mv, .. } = bot.block_next_move() else {
        panic!("expected a move on the reset board");
    };
    assert!(
        mv.expected_y.iter().all(|&y| y != 0),
        "row 0 is solid after reset; no cell should land there, got {:?}",
        mv.expected_y
    );

    bot.destroy();
}
