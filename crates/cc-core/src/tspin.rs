//! T-spin classification per §4.1.
//!
//! The four corners examined are the diagonal neighbours of the T piece's
//! pivot cell, which sits at local offset `(1, 1)` from the anchor in every
//! rotation (true for all four shapes in `pieces.rs`), so the corner set
//! `(0,0), (2,0), (0,2), (2,2)` is rotation-independent.

use cold_clear_types::{Rotation, SpinStatus};

const CORNERS: [(i8, i8); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];

/// Corners on the side the T's stem points away from the flat edge (i.e.
/// the side the T "points" toward); these are the two corners that, when
/// both filled, are sufficient on their own for a full T-spin.
fn front_corners(rotation: Rotation) -> [(i8, i8); 2] {
    match rotation {
        Rotation::North => [(0, 0), (2, 0)],
        Rotation::East => [(2, 0), (2, 2)],
        Rotation::South => [(0, 2), (2, 2)],
        Rotation::West => [(0, 0), (0, 2)],
    }
}

/// Classify the T-spin status of a final resting position.
///
/// * `x`, `y` — the anchor of the locked T piece.
/// * `rotation` — its final rotation.
/// * `was_rotation` — the last movement before lock was a successful
///   rotation (as opposed to a translation or a drop with no prior turn).
/// * `last_kick_index` — index into the five-entry kick table that the
///   rotation succeeded on (0 = no kick needed).
/// * `is_filled` — true if the board considers `(x, y)` filled or out of
///   bounds (both count toward a T-spin corner).
pub fn classify<F: Fn(i8, i8) -> bool>(
    x: i8,
    y: i8,
    rotation: Rotation,
    was_rotation: bool,
    last_kick_index: usize,
    is_filled: F,
) -> SpinStatus {
    if !was_rotation {
        return SpinStatus::None;
    }

    let filled_count = CORNERS
        .iter()
        .filter(|&&(cx, cy)| is_filled(x + cx, y + cy))
        .count();

    if filled_count < 3 {
        return SpinStatus::None;
    }

    let front_filled = front_corners(rotation)
        .iter()
        .filter(|&&(cx, cy)| is_filled(x + cx, y + cy))
        .count();

    // Guideline "rescue kick" rule: a spin reached via the final kick
    // offset (index 4 of the five tried) is always promoted to a full
    // T-spin, even when only a back-corner pair is filled.
    if front_filled == 2 || last_kick_index == 4 {
        SpinStatus::Full
    } else {
        SpinStatus::Mini
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rotation_is_never_a_spin() {
        let status = classify(0, 0, Rotation::North, false, 0, |_, _| true);
        assert_eq!(status, SpinStatus::None);
    }

    #[test]
    fn fewer_than_three_corners_is_not_a_spin() {
        // Only the two top corners filled (North's front corners).
        let status = classify(0, 0, Rotation::North, true, 0, |x, y| (x, y) == (0, 0) || (x, y) == (2, 0));
        assert_eq!(status, SpinStatus::None);
    }

    #[test]
    fn three_corners_with_both_front_filled_is_full() {
        // North: front = top corners. Fill both tops plus one bottom.
        let status = classify(0, 0, Rotation::North, true, 1, |x, y| {
            matches!((x, y), (0, 0) | (2, 0) | (0, 2))
        });
        assert_eq!(status, SpinStatus::Full);
    }

    #[test]
    fn three_corners_with_back_pair_filled_is_mini() {
        // North: back = bottom corners. Fill both bottoms plus one top,
        // without using the rescue kick.
        let status = classify(0, 0, Rotation::North, true, 1, |x, y| {
            matches!((x, y), (0, 2) | (2, 2) | (0, 0))
        });
        assert_eq!(status, SpinStatus::Mini);
    }

    #[test]
    fn rescue_kick_promotes_to_full_even_without_front_pair() {
        let status = classify(0, 0, Rotation::North, true, 4, |x, y| {
            matches!((x, y), (0, 2) | (2, 2) | (0, 0))
        });
        assert_eq!(status, SpinStatus::Full);
    }
}
