//! Static board value and transition reward — §4.3.

use cold_clear_core::{generate, Board, Placement};
use cold_clear_types::{MovementMode, PcLoop, PieceKind, SpawnRule, BOARD_HEIGHT, VISIBLE_HEIGHT};

use crate::weights::Weights;

/// The internal row index of the topmost row the client-visible board
/// covers (row increases downward, so "visible" is the bottom
/// `VISIBLE_HEIGHT` rows of the full `BOARD_HEIGHT`-tall grid).
fn visible_top() -> i8 {
    (BOARD_HEIGHT - VISIBLE_HEIGHT) as i8
}

fn column_heights(board: &Board) -> [i32; 10] {
    let mut heights = [0i32; 10];
    for (x, h) in heights.iter_mut().enumerate() {
        *h = board.column_height(x as i8) as i32;
    }
    heights
}

fn top_half_count(board: &Board) -> i32 {
    count_filled_in_rows(board, visible_top(), visible_top() + (VISIBLE_HEIGHT as i8) / 2)
}

fn top_quarter_count(board: &Board) -> i32 {
    count_filled_in_rows(board, visible_top(), visible_top() + (VISIBLE_HEIGHT as i8) / 4)
}

fn count_filled_in_rows(board: &Board, from_y: i8, to_y: i8) -> i32 {
    let mut count = 0;
    for y in from_y..to_y {
        for x in 0..board.width() as i8 {
            if board.is_occupied(x, y) {
                count += 1;
            }
        }
    }
    count
}

/// Filled-vs-empty transitions within each visible row, treating the walls
/// either side of the board as filled (standard guideline definition).
fn row_transitions(board: &Board) -> i32 {
    let mut transitions = 0;
    for y in visible_top()..BOARD_HEIGHT as i8 {
        let mut previous = true; // left wall
        for x in 0..board.width() as i8 {
            let filled = board.is_occupied(x, y);
            if filled != previous {
                transitions += 1;
            }
            previous = filled;
        }
        if !previous {
            transitions += 1; // right wall
        }
    }
    transitions
}

fn bumpiness(heights: &[i32; 10]) -> (i32, i32) {
    let mut sum = 0;
    let mut sum_sq = 0;
    for pair in heights.windows(2) {
        let diff = (pair[0] - pair[1]).abs();
        sum += diff;
        sum_sq += diff * diff;
    }
    (sum, sum_sq)
}

/// Empty cells with a filled cell somewhere above them in the same column,
/// truncated to that column's stack depth (cells above the topmost filled
/// cell in a column are never "covered").
fn covered_cells(board: &Board) -> (i32, i32) {
    let mut count = 0;
    for x in 0..board.width() as i8 {
        let mut seen_filled_above = false;
        for y in visible_top()..BOARD_HEIGHT as i8 {
            if board.is_occupied(x, y) {
                seen_filled_above = true;
            } else if seen_filled_above {
                count += 1;
            }
        }
    }
    (count, count * count)
}

/// Covered cells that sit directly beneath an overhang (the immediate cell
/// above is filled), as opposed to `covered_cells`'s broader "something
/// above is filled" definition — these are the holes a piece falling
/// straight down could never have produced without rotation/kicks.
fn cavity_cells(board: &Board) -> (i32, i32) {
    let mut count = 0;
    for x in 0..board.width() as i8 {
        for y in (visible_top() + 1)..BOARD_HEIGHT as i8 {
            if !board.is_occupied(x, y) && board.is_occupied(x, y - 1) {
                count += 1;
            }
        }
    }
    (count, count * count)
}

/// Filled cells with an empty cell directly below them.
fn overhang_cells(board: &Board) -> (i32, i32) {
    let mut count = 0;
    for x in 0..board.width() as i8 {
        for y in visible_top()..(BOARD_HEIGHT as i8 - 1) {
            if board.is_occupied(x, y) && !board.is_occupied(x, y + 1) {
                count += 1;
            }
        }
    }
    (count, count * count)
}

/// Depth of the single deepest well (a column lower than both neighbours),
/// its column index, bounded by `max_well_depth`.
fn deepest_well(heights: &[i32; 10], max_well_depth: i32) -> (usize, i32) {
    let mut best_col = 0;
    let mut best_depth = 0;
    for x in 0..heights.len() {
        let left = if x == 0 { heights[x] } else { heights[x - 1] };
        let right = if x == heights.len() - 1 { heights[x] } else { heights[x + 1] };
        let depth = left.min(right) - heights[x];
        if depth > best_depth {
            best_depth = depth;
            best_col = x;
        }
    }
    (best_col, best_depth.clamp(0, max_well_depth.max(0)))
}

/// How many of the up to 4 "T-slot" shapes (a notch a T-piece could spin
/// into) are currently present on the board, bucketed by how many rows
/// would clear if a T were placed there right now. Grounded directly in
/// this crate's own move generator and T-spin classifier rather than a
/// separate bitboard pattern table.
fn tslot_counts(board: &Board) -> [i32; 4] {
    let mut counts = [0i32; 4];
    for candidate in generate(board, PieceKind::T, MovementMode::ZeroG, SpawnRule::Row19Or20) {
        if candidate.spin == cold_clear_types::SpinStatus::None {
            continue;
        }
        let mut scratch = board.clone();
        let locked = scratch.lock_piece(&candidate.final_state.shape(), candidate.final_state.x, candidate.final_state.y, PieceKind::T);
        if !locked {
            continue;
        }
        let cleared = scratch.clear_full_rows().len().min(3);
        counts[cleared] += 1;
    }
    counts
}

fn is_visible_board_empty(board: &Board) -> bool {
    for y in visible_top()..BOARD_HEIGHT as i8 {
        for x in 0..board.width() as i8 {
            if board.is_occupied(x, y) {
                return false;
            }
        }
    }
    true
}

/// Static board value `V(board)` — §4.3.
pub fn static_value(board: &Board, weights: &Weights, b2b_active: bool, incoming_garbage: i32, pcloop: PcLoop) -> i64 {
    let heights = column_heights(board);
    let height_sum: i32 = heights.iter().sum();
    let (bump, bump_sq) = bumpiness(&heights);
    let (covered, covered_sq) = covered_cells(board);
    let (cavity, cavity_sq) = cavity_cells(board);
    let (overhang, overhang_sq) = overhang_cells(board);
    let (well_col, well_depth) = deepest_well(&heights, weights.max_well_depth);
    let tslot = tslot_counts(board);

    let mut value: i64 = 0;
    value += weights.back_to_back as i64 * b2b_active as i64;
    value += weights.height as i64 * height_sum as i64;
    value += weights.top_half as i64 * top_half_count(board) as i64;
    value += weights.top_quarter as i64 * top_quarter_count(board) as i64;
    value += weights.row_transitions as i64 * row_transitions(board) as i64;
    value += weights.bumpiness as i64 * bump as i64;
    value += weights.bumpiness_sq as i64 * bump_sq as i64;
    value += weights.covered_cells as i64 * covered as i64;
    value += weights.covered_cells_sq as i64 * covered_sq as i64;
    value += weights.cavity_cells as i64 * cavity as i64;
    value += weights.cavity_cells_sq as i64 * cavity_sq as i64;
    value += weights.overhang_cells as i64 * overhang as i64;
    value += weights.overhang_cells_sq as i64 * overhang_sq as i64;
    value += weights.well_depth as i64 * well_depth as i64;
    value += weights.well_column[well_col] as i64 * well_depth as i64;
    for (k, &count) in tslot.iter().enumerate() {
        value += weights.tslot[k] as i64 * count as i64;
    }

    if incoming_garbage > 0 && height_sum > 0 {
        let jeopardy_weight = if weights.timed_jeopardy {
            weights.jeopardy
        } else {
            weights.jeopardy.min(0)
        };
        value += jeopardy_weight as i64 * incoming_garbage as i64;
    }

    if !matches!(pcloop, PcLoop::Off) {
        let filled: i32 = count_filled_in_rows(board, visible_top(), BOARD_HEIGHT as i8);
        let total_cells = (VISIBLE_HEIGHT as i32) * (board.width() as i32);
        let emptiness_ratio_permille = ((total_cells - filled).max(0) * 1000) / total_cells.max(1);
        value += weights.perfect_clear as i64 * emptiness_ratio_permille as i64 / 1000;
    }

    value
}

const COMBO_GARBAGE_TABLE: [i32; 12] = [0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 4, 5];

fn combo_garbage(combo: u32) -> i32 {
    let idx = (combo as usize).min(COMBO_GARBAGE_TABLE.len() - 1);
    COMBO_GARBAGE_TABLE[idx]
}

/// Transition reward `R(board_before -> placement -> board_after)` — §4.3.
/// `b2b_active_before`/`combo_before` are the scoring state immediately
/// prior to this placement; returns the reward plus the scoring state to
/// carry forward (new b2b flag, new combo count).
pub fn transition_reward(
    weights: &Weights,
    placement: &Placement,
    board_after: &Board,
    path_len: usize,
    b2b_active_before: bool,
    combo_before: u32,
) -> (i64, bool, u32) {
    let lines = placement.cleared_rows.len();
    let is_tspin = matches!(placement.spin, cold_clear_types::SpinStatus::Full);
    let is_mini = matches!(placement.spin, cold_clear_types::SpinStatus::Mini);

    let mut reward: i64 = 0;

    if lines > 0 {
        let clear_bonus = match (is_tspin, is_mini, lines) {
            (true, _, 1) => weights.tspin1,
            (true, _, 2) => weights.tspin2,
            (true, _, 3) => weights.tspin3,
            (_, true, 1) => weights.mini_tspin1,
            (_, true, 2) => weights.mini_tspin2,
            (false, false, 1) => weights.clear1,
            (false, false, 2) => weights.clear2,
            (false, false, 3) => weights.clear3,
            (false, false, 4) => weights.clear4,
            _ => 0,
        };
        reward += clear_bonus as i64;

        let b2b_eligible = lines == 4 || is_tspin || is_mini;
        if b2b_eligible && b2b_active_before {
            reward += weights.b2b_clear as i64;
        }

        let new_combo = combo_before + 1;
        reward += weights.combo_garbage as i64 * combo_garbage(new_combo) as i64;

        reward += weights.back_to_back as i64 * b2b_active_before as i64;

        let is_perfect_clear = is_visible_board_empty(board_after);
        if is_perfect_clear {
            reward += weights.perfect_clear as i64;
            if weights.stack_pc_damage {
                reward += weights.perfect_clear as i64;
            }
        }

        let new_b2b = b2b_eligible;
        reward += weights.move_time as i64 * path_len as i64;

        if placement.kind == PieceKind::T && placement.spin == cold_clear_types::SpinStatus::None {
            reward += weights.wasted_t as i64;
        }

        return (reward, new_b2b, new_combo);
    }

    reward += weights.move_time as i64 * path_len as i64;
    if placement.kind == PieceKind::T {
        reward += weights.wasted_t as i64;
    }

    (reward, b2b_active_before, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cold_clear_core::{place, PieceState};
    use cold_clear_types::{Rotation, SpinStatus};

    #[test]
    fn empty_board_has_zero_holes_and_bumpiness() {
        let board = Board::new();
        let weights = Weights::default();
        let heights = column_heights(&board);
        assert_eq!(heights, [0; 10]);
        let (bump, _) = bumpiness(&heights);
        assert_eq!(bump, 0);
        let _ = static_value(&board, &weights, false, 0, PcLoop::Off);
    }

    #[test]
    fn overhang_counts_filled_cell_over_empty() {
        let mut board = Board::new();
        let bottom = board.height() as i8 - 1;
        board.set(0, bottom - 1, Some(PieceKind::L));
        let (overhang, _) = overhang_cells(&board);
        assert_eq!(overhang, 1);
    }

    #[test]
    fn clear_reward_prefers_tetris_over_singles() {
        let weights = Weights::default();
        let mut board = Board::new();
        let bottom = board.height() as i8 - 1;
        for x in 1..board.width() as i8 {
            for row in (bottom - 3)..=bottom {
                board.set(x, row, Some(PieceKind::L));
            }
        }
        let state = PieceState {
            kind: PieceKind::I,
            rotation: Rotation::West,
            x: 0,
            y: bottom - 3,
        };
        let (board_after, placement) = place(&state, &board, SpinStatus::None).unwrap();
        assert_eq!(placement.cleared_rows.len(), 4);
        let (reward, _, _) = transition_reward(&weights, &placement, &board_after, 5, false, 0);
        assert!(reward > 0);
    }

    #[test]
    fn tspin_double_outscores_an_ordinary_double_under_default_weights() {
        let weights = Weights::default();
        let bottom = 39i8;

        // Floor row filled but for a single-column notch at x=4; the row
        // above filled but for the 3-wide gap at x=3..=5 — the T's final
        // South-rotation cells land in exactly those gaps, clearing both.
        let mut tspin_board = Board::new();
        for x in 0..10i8 {
            if x != 4 {
                tspin_board.set(x, bottom, Some(PieceKind::L));
            }
            if !(3..=5).contains(&x) {
                tspin_board.set(x, bottom - 1, Some(PieceKind::L));
            }
        }
        let t_state = PieceState {
            kind: PieceKind::T,
            rotation: Rotation::South,
            x: 3,
            y: bottom - 2,
        };
        let (tspin_board_after, tspin_placement) = place(&t_state, &tspin_board, SpinStatus::Full).unwrap();
        assert_eq!(tspin_placement.cleared_rows.len(), 2);
        let (tspin_reward, _, _) = transition_reward(&weights, &tspin_placement, &tspin_board_after, 6, false, 0);

        // An ordinary (non-spin) double clear with an O piece, same line count.
        let mut flat_board = Board::new();
        for x in 0..10i8 {
            if x != 1 && x != 2 {
                flat_board.set(x, bottom, Some(PieceKind::L));
                flat_board.set(x, bottom - 1, Some(PieceKind::L));
            }
        }
        let o_state = PieceState {
            kind: PieceKind::O,
            rotation: Rotation::North,
            x: 0,
            y: bottom - 1,
        };
        let (flat_board_after, flat_placement) = place(&o_state, &flat_board, SpinStatus::None).unwrap();
        assert_eq!(flat_placement.cleared_rows.len(), 2);
        let (flat_reward, _, _) = transition_reward(&weights, &flat_placement, &flat_board_after, 6, false, 0);

        assert!(tspin_reward > flat_reward);
    }
}
