//! Tetromino shapes and the SRS rotation system: shapes in all four
//! rotations plus wall-kick tables. Reference: the guideline SRS tables
//! (https://tetris.wiki/SRS), expressed in this board's row-increases-
//! downward convention.

use cold_clear_types::{PieceKind, Rotation};

/// Offset of a single mino relative to the piece's anchor.
pub type MinoOffset = (i8, i8);

/// Shape of a piece: four mino offsets from its anchor.
pub type PieceShape = [MinoOffset; 4];

pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => i_shape(rotation),
        PieceKind::O => o_shape(rotation),
        PieceKind::T => t_shape(rotation),
        PieceKind::S => s_shape(rotation),
        PieceKind::Z => z_shape(rotation),
        PieceKind::J => j_shape(rotation),
        PieceKind::L => l_shape(rotation),
    }
}

fn i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

fn o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

fn t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Five (dx, dy) kick offsets to try, in order, for one rotation
/// transition; the first non-overlapping offset succeeds.
pub type KickTable = [[(i8, i8); 5]; 8];

pub fn get_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

const O_KICKS: KickTable = [[(0, 0); 5]; 8];

/// Shared by J, L, S, T, Z.
const JLSTZ_KICKS: KickTable = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // N->E
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // N->W
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // E->N
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // E->S
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // S->E
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // S->W
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // W->S
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // W->N
];

const I_KICKS: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // N->E
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // N->W
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // E->N
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // E->S
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // S->E
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // S->W
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // W->S
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // W->N
];

fn kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,
        (Rotation::North, false) => 1,
        (Rotation::East, false) => 2,
        (Rotation::East, true) => 3,
        (Rotation::South, false) => 4,
        (Rotation::South, true) => 5,
        (Rotation::West, false) => 6,
        (Rotation::West, true) => 7,
    }
}

/// Attempt a rotation with wall kicks. Returns the new shape, rotation,
/// and the kick offset that succeeded (the "last kick") or `None` if every
/// offset collides.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    is_valid: impl Fn(i8, i8) -> bool,
) -> Option<(PieceShape, Rotation, (i8, i8), usize)> {
    let new_rotation = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };

    let new_shape = get_shape(kind, new_rotation);
    let kicks = &get_kick_table(kind)[kick_index(rotation, clockwise)];

    for (kick_idx, &(dx, dy)) in kicks.iter().enumerate() {
        let (nx, ny) = (x + dx, y + dy);
        if new_shape.iter().all(|&(mx, my)| is_valid(nx + mx, ny + my)) {
            return Some((new_shape, new_rotation, (dx, dy), kick_idx));
        }
    }
    None
}

/// Spawn anchor (x, y) for a piece appearing at the top of the playfield.
/// Row 18 sits two rows above the visible field's top row (row 20 in this
/// board's internal, row-increases-downward numbering), matching the
/// guideline's "row 19/20" spawn convention.
pub const SPAWN_ROW: i8 = 18;
pub const SPAWN_COL: i8 = 3;

pub fn get_spawn_shape(kind: PieceKind) -> PieceShape {
    get_shape(kind, Rotation::North)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i_piece_shapes() {
        assert_eq!(i_shape(Rotation::North), [(0, 1), (1, 1), (2, 1), (3, 1)]);
        assert_eq!(i_shape(Rotation::East), [(2, 0), (2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn o_piece_does_not_rotate() {
        for r in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
            assert_eq!(o_shape(r), [(1, 0), (2, 0), (1, 1), (2, 1)]);
        }
    }

    #[test]
    fn o_kicks_are_all_zero() {
        for row in O_KICKS.iter() {
            for &(dx, dy) in row {
                assert_eq!((dx, dy), (0, 0));
            }
        }
    }

    #[test]
    fn rotation_without_obstruction_uses_first_kick() {
        let result = try_rotate(PieceKind::T, Rotation::North, 4, 10, true, |_, _| true);
        let (_, rotation, offset, kick_idx) = result.expect("open field rotation should succeed");
        assert_eq!(rotation, Rotation::East);
        assert_eq!(offset, (0, 0));
        assert_eq!(kick_idx, 0);
    }

    #[test]
    fn rotation_fails_when_every_kick_collides() {
        let result = try_rotate(PieceKind::T, Rotation::North, 4, 10, true, |_, _| false);
        assert!(result.is_none());
    }
}
