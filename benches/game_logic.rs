use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cold_clear_core::{generate, Bag, Board};
use cold_clear_eval::Weights;
use cold_clear_tree::Tree;
use cold_clear_types::{MovementMode, PieceKind, SpawnRule};

fn bench_move_generation_empty_board(c: &mut Criterion) {
    let board = Board::new();
    c.bench_function("generate_zero_g_empty_board", |b| {
        b.iter(|| {
            generate(
                black_box(&board),
                PieceKind::T,
                MovementMode::ZeroG,
                SpawnRule::Row19Or20,
            )
        })
    });
}

fn bench_move_generation_cluttered_board(c: &mut Criterion) {
    let mut board = Board::new();
    for y in 30..40 {
        for x in 0..10 {
            if (x + y as i8) % 3 != 0 {
                board.set(x, y, Some(PieceKind::L));
            }
        }
    }
    c.bench_function("generate_zero_g_cluttered_board", |b| {
        b.iter(|| {
            generate(
                black_box(&board),
                PieceKind::S,
                MovementMode::ZeroG,
                SpawnRule::Row19Or20,
            )
        })
    });
}

fn fresh_tree() -> Tree {
    Tree::new(
        Board::new(),
        PieceKind::T,
        None,
        Bag::full(),
        false,
        0,
        vec![PieceKind::I, PieceKind::O, PieceKind::J, PieceKind::L],
        MovementMode::ZeroG,
        SpawnRule::Row19Or20,
        true,
        &Weights::default(),
        0,
        cold_clear_types::PcLoop::Off,
    )
}

/// Expands a tree to a fixed node budget, the same shape of work an
/// expansion thread does between commits.
fn bench_fixed_budget_expansion(c: &mut Criterion) {
    let weights = Weights::default();
    c.bench_function("expand_to_2000_nodes", |b| {
        b.iter(|| {
            let mut tree = fresh_tree();
            while tree.len() < 2000 {
                let Some(id) = tree.select_frontier() else {
                    break;
                };
                tree.expand(id, black_box(&weights), 0, cold_clear_types::PcLoop::Off);
            }
            tree.len()
        })
    });
}

criterion_group!(
    benches,
    bench_move_generation_empty_board,
    bench_move_generation_cluttered_board,
    bench_fixed_budget_expansion,
);
criterion_main!(benches);
