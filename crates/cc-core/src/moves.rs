//! Move generator — §4.2.
//!
//! Breadth-first exploration over `(piece_state, spin_flag)` states under
//! the movement alphabet permitted by a `MovementMode`. BFS visits shortest
//! paths first, which is what makes "first path found" the canonical one.
//!
//! Token semantics chosen here (the spec leaves exact encoding to the
//! implementer, see `SPEC_FULL.md` §5(b)-adjacent notes in `DESIGN.md`):
//! `Left`/`Right` translate by one column, `Cw`/`Ccw` rotate (with kicks)
//! by one step, and `Drop` means "move down by one row" in `zero_g`/
//! `twenty_g` mode (letting BFS pause mid-fall for tucks and spins) but
//! "drop straight to the floor" in `hard_drop_only` mode, where it is
//! always the single final token.

use std::collections::{HashSet, VecDeque};

use arrayvec::ArrayVec;
use cold_clear_types::{MovementMode, MovementToken, PieceKind, Rotation, SpawnRule, SpinStatus, MAX_MOVEMENTS};

use crate::board::Board;
use crate::pieces;
use crate::placement::{ghost_drop, is_supported, PieceState};
use crate::tspin;

pub type Path = ArrayVec<MovementToken, MAX_MOVEMENTS>;

/// A single reachable final placement, with the canonical (shortest) input
/// path that reaches it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMove {
    pub final_state: PieceState,
    pub spin: SpinStatus,
    pub path: Path,
}

fn rotation_index(rotation: Rotation) -> usize {
    match rotation {
        Rotation::North => 0,
        Rotation::East => 1,
        Rotation::South => 2,
        Rotation::West => 3,
    }
}

fn spawn_state(kind: PieceKind, spawn_rule: SpawnRule) -> PieceState {
    let y = match spawn_rule {
        SpawnRule::Row19Or20 => pieces::SPAWN_ROW,
        // Enters from above the buffer and falls; BFS's ordinary Drop
        // successors carry it down through any holes it can reach.
        SpawnRule::Row21AndFall => 0,
    };
    PieceState {
        kind,
        rotation: Rotation::North,
        x: pieces::SPAWN_COL,
        y,
    }
}

/// Generate every unique final placement reachable from spawn, each tagged
/// with its canonical input path. An empty result means the piece cannot
/// be placed at all (topped out).
pub fn generate(
    board: &Board,
    kind: PieceKind,
    mode: MovementMode,
    spawn_rule: SpawnRule,
) -> Vec<CandidateMove> {
    let start = spawn_state(kind, spawn_rule);
    if !start.fits(board) {
        return Vec::new();
    }

    match mode {
        MovementMode::HardDropOnly => generate_hard_drop_only(board, start),
        MovementMode::ZeroG => generate_bfs(board, start, false),
        MovementMode::TwentyG => generate_bfs(board, start, true),
    }
}

#[derive(Clone, Copy)]
struct Arrival {
    was_rotation: bool,
    last_kick_index: usize,
}

/// `hard_drop_only`: explore rotations at spawn only (kicks may still
/// translate the piece), then the single final hard-drop token.
fn generate_hard_drop_only(board: &Board, start: PieceState) -> Vec<CandidateMove> {
    type Key = (i8, i8, usize, bool);

    let mut visited: HashSet<Key> = HashSet::new();
    let mut queue: VecDeque<(PieceState, Arrival, Path)> = VecDeque::new();
    let mut results: Vec<CandidateMove> = Vec::new();
    let mut seen_final: HashSet<(Vec<(i8, i8)>, Option<&'static str>)> = HashSet::new();

    let start_key = (start.x, start.y, rotation_index(start.rotation), false);
    visited.insert(start_key);
    queue.push_back((
        start,
        Arrival {
            was_rotation: false,
            last_kick_index: 0,
        },
        Path::new(),
    ));

    while let Some((state, arrival, path)) = queue.pop_front() {
        let dropped = ghost_drop(&state, board);
        let mut drop_path = path.clone();
        if drop_path.try_push(MovementToken::Drop).is_ok() {
            emit_terminal(board, &dropped, arrival, &drop_path, &mut results, &mut seen_final);
        }

        if path.len() >= MAX_MOVEMENTS {
            continue;
        }

        for clockwise in [true, false] {
            let token = if clockwise { MovementToken::Cw } else { MovementToken::Ccw };
            if let Some((_, new_rot, (dx, dy), kick_idx)) = pieces::try_rotate(
                state.kind,
                state.rotation,
                state.x,
                state.y,
                clockwise,
                |x, y| board.is_valid(x, y),
            ) {
                let next = PieceState {
                    rotation: new_rot,
                    x: state.x + dx,
                    y: state.y + dy,
                    ..state
                };
                let key = (next.x, next.y, rotation_index(next.rotation), true);
                if visited.insert(key) {
                    let mut next_path = path.clone();
                    let _ = next_path.try_push(token);
                    queue.push_back((
                        next,
                        Arrival {
                            was_rotation: true,
                            last_kick_index: kick_idx,
                        },
                        next_path,
                    ));
                }
            }
        }
    }

    results
}

/// `zero_g` / `twenty_g`: full alphabet. When `gravity_after_move` is set
/// (20G), every Left/Right/Cw/Ccw transition is immediately followed by a
/// virtual maximal fall, without consuming extra tokens.
fn generate_bfs(board: &Board, start: PieceState, gravity_after_move: bool) -> Vec<CandidateMove> {
    type Key = (i8, i8, usize, bool);

    let mut visited: HashSet<Key> = HashSet::new();
    let mut queue: VecDeque<(PieceState, Arrival, Path)> = VecDeque::new();
    let mut results: Vec<CandidateMove> = Vec::new();
    let mut seen_final: HashSet<(Vec<(i8, i8)>, Option<&'static str>)> = HashSet::new();

    let start = if gravity_after_move {
        ghost_drop(&start, board)
    } else {
        start
    };
    let start_key = (start.x, start.y, rotation_index(start.rotation), false);
    visited.insert(start_key);
    queue.push_back((
        start,
        Arrival {
            was_rotation: false,
            last_kick_index: 0,
        },
        Path::new(),
    ));

    while let Some((state, arrival, path)) = queue.pop_front() {
        emit_terminal(board, &state, arrival, &path, &mut results, &mut seen_final);

        if path.len() >= MAX_MOVEMENTS {
            continue;
        }

        // Left / Right
        for (dx, token) in [(-1i8, MovementToken::Left), (1i8, MovementToken::Right)] {
            let mut next = PieceState {
                x: state.x + dx,
                ..state
            };
            if !next.fits(board) {
                continue;
            }
            if gravity_after_move {
                next = ghost_drop(&next, board);
            }
            let key = (next.x, next.y, rotation_index(next.rotation), false);
            if visited.insert(key) {
                let mut next_path = path.clone();
                if next_path.try_push(token).is_ok() {
                    queue.push_back((
                        next,
                        Arrival {
                            was_rotation: false,
                            last_kick_index: 0,
                        },
                        next_path,
                    ));
                }
            }
        }

        // Cw / Ccw
        for clockwise in [true, false] {
            let token = if clockwise { MovementToken::Cw } else { MovementToken::Ccw };
            if let Some((_, new_rot, (dx, dy), kick_idx)) = pieces::try_rotate(
                state.kind,
                state.rotation,
                state.x,
                state.y,
                clockwise,
                |x, y| board.is_valid(x, y),
            ) {
                let mut next = PieceState {
                    rotation: new_rot,
                    x: state.x + dx,
                    y: state.y + dy,
                    ..state
                };
                if gravity_after_move {
                    next = ghost_drop(&next, board);
                }
                let key = (next.x, next.y, rotation_index(next.rotation), true);
                if visited.insert(key) {
                    let mut next_path = path.clone();
                    if next_path.try_push(token).is_ok() {
                        queue.push_back((
                            next,
                            Arrival {
                                was_rotation: true,
                                last_kick_index: kick_idx,
                            },
                            next_path,
                        ));
                    }
                }
            }
        }

        // Single-cell soft drop, enabling tucks/spins under overhangs.
        if !gravity_after_move {
            let next = PieceState {
                y: state.y + 1,
                ..state
            };
            if next.fits(board) {
                let key = (next.x, next.y, rotation_index(next.rotation), false);
                if visited.insert(key) {
                    let mut next_path = path.clone();
                    if next_path.try_push(MovementToken::Drop).is_ok() {
                        queue.push_back((
                            next,
                            Arrival {
                                was_rotation: false,
                                last_kick_index: 0,
                            },
                            next_path,
                        ));
                    }
                }
            }
        }
    }

    results
}

fn emit_terminal(
    board: &Board,
    state: &PieceState,
    arrival: Arrival,
    path: &Path,
    results: &mut Vec<CandidateMove>,
    seen_final: &mut HashSet<(Vec<(i8, i8)>, Option<&'static str>)>,
) {
    if !is_supported(state, board) {
        return;
    }

    let spin = if state.kind == PieceKind::T {
        tspin::classify(state.x, state.y, state.rotation, arrival.was_rotation, arrival.last_kick_index, |x, y| {
            board.is_out_of_bounds(x, y) || board.is_occupied(x, y)
        })
    } else {
        SpinStatus::None
    };

    let mut cells: Vec<(i8, i8)> = state.cells().to_vec();
    cells.sort_unstable();
    let dedup_key = (cells, spin.as_str());

    if seen_final.insert(dedup_key) {
        results.push(CandidateMove {
            final_state: *state,
            spin,
            path: path.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cold_clear_types::SpawnRule;

    fn counts(kind: PieceKind) -> usize {
        let board = Board::new();
        generate(&board, kind, MovementMode::ZeroG, SpawnRule::Row19Or20).len()
    }

    #[test]
    fn empty_board_placement_counts_match_spec() {
        assert_eq!(counts(PieceKind::I), 17);
        assert_eq!(counts(PieceKind::O), 9);
        assert_eq!(counts(PieceKind::S), 17);
        assert_eq!(counts(PieceKind::Z), 17);
        assert_eq!(counts(PieceKind::T), 34);
        assert_eq!(counts(PieceKind::L), 34);
        assert_eq!(counts(PieceKind::J), 34);
    }

    #[test]
    fn hard_drop_only_paths_are_rotations_then_one_drop() {
        let board = Board::new();
        let moves = generate(&board, PieceKind::T, MovementMode::HardDropOnly, SpawnRule::Row19Or20);
        assert!(!moves.is_empty());
        for m in &moves {
            assert_eq!(m.path.last(), Some(&MovementToken::Drop));
            assert!(m.path[..m.path.len() - 1]
                .iter()
                .all(|t| matches!(t, MovementToken::Cw | MovementToken::Ccw)));
        }
    }

    #[test]
    fn all_paths_respect_the_token_budget() {
        let board = Board::new();
        for kind in PieceKind::ALL {
            for m in generate(&board, kind, MovementMode::ZeroG, SpawnRule::Row19Or20) {
                assert!(m.path.len() <= MAX_MOVEMENTS);
            }
        }
    }

    #[test]
    fn topped_out_spawn_yields_no_placements() {
        let mut board = Board::new();
        let spawn = spawn_state(PieceKind::T, SpawnRule::Row19Or20);
        for &(x, y) in spawn.cells().iter() {
            board.set(x, y, Some(PieceKind::L));
        }
        assert!(generate(&board, PieceKind::T, MovementMode::ZeroG, SpawnRule::Row19Or20).is_empty());
    }
}
