//! §8 scenario 4, "dead position" — exercised directly against
//! `cold_clear_core::Board`/`cold_clear_tree::Tree` rather than through
//! `Bot`'s public 400-bool board encoding: that encoding can only ever
//! describe the visible playfield, never the two buffer rows spawn lives
//! in, so no board a client can submit ever actually blocks spawn. See
//! `DESIGN.md`'s "Open question decisions" for the full reasoning.

use cold_clear_core::{Bag, Board, PieceState};
use cold_clear_eval::Weights;
use cold_clear_tree::Tree;
use cold_clear_types::{MovementMode, PcLoop, PieceKind, SpawnRule};

#[test]
fn a_board_with_spawn_blocked_leaves_the_root_dead_after_one_expansion() {
    let mut board = Board::new();
    // Mirror cc-core's own topped-out fixture: occupy every cell T's
    // spawn shape would need, so it can't even fit at its starting state.
    for &(x, y) in PieceState::spawn(PieceKind::T).cells().iter() {
        board.set(x, y, Some(PieceKind::L));
    }

    let weights = Weights::default();
    let mut tree = Tree::new(
        board,
        PieceKind::T,
        None,
        Bag::full(),
        false,
        0,
        Vec::new(),
        MovementMode::ZeroG,
        SpawnRule::Row19Or20,
        true,
        &weights,
        0,
        PcLoop::Off,
    );

    assert!(!tree.is_root_dead(), "root shouldn't be dead before it's ever been expanded");
    let root = tree.root_id();
    tree.expand(root, &weights, 0, PcLoop::Off);
    assert!(tree.is_root_dead());
}
