//! Piece states and placements — §3/§4.1.

use arrayvec::ArrayVec;
use cold_clear_types::{PieceKind, Rotation, SpinStatus};

use crate::board::Board;
use crate::error::{PlacementError, PlacementResult};
use crate::pieces::{self, PieceShape};

/// `(kind, rotation, x, y)`, where `(x, y)` is the position of the piece's
/// canonical anchor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceState {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl PieceState {
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: pieces::SPAWN_COL,
            y: pieces::SPAWN_ROW,
        }
    }

    pub fn shape(&self) -> PieceShape {
        pieces::get_shape(self.kind, self.rotation)
    }

    /// The four absolute cells this piece occupies.
    pub fn cells(&self) -> [(i8, i8); 4] {
        let shape = self.shape();
        [
            (self.x + shape[0].0, self.y + shape[0].1),
            (self.x + shape[1].0, self.y + shape[1].1),
            (self.x + shape[2].0, self.y + shape[2].1),
            (self.x + shape[3].0, self.y + shape[3].1),
        ]
    }

    /// All four cells are in bounds and empty.
    pub fn fits(&self, board: &Board) -> bool {
        self.cells().iter().all(|&(x, y)| board.is_valid(x, y))
    }

    fn translated(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// A final locked placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub kind: PieceKind,
    pub final_state: PieceState,
    pub spin: SpinStatus,
    pub cleared_rows: ArrayVec<usize, 4>,
}

/// Whether `state` is resting: moving straight down by one cell would
/// collide (out of bounds or occupied). Pieces are only legal to lock when
/// supported.
pub fn is_supported(state: &PieceState, board: &Board) -> bool {
    !state.translated(0, 1).fits(board)
}

/// The state reached by dropping `state` straight down as far as it can
/// go without leaving bounds or overlapping a filled cell.
pub fn ghost_drop(state: &PieceState, board: &Board) -> PieceState {
    let mut current = *state;
    loop {
        let next = current.translated(0, 1);
        if next.fits(board) {
            current = next;
        } else {
            return current;
        }
    }
}

/// Validate that `state` is a legal place to lock a piece: in bounds,
/// unoccupied, and resting on something.
pub fn check_legal(state: &PieceState, board: &Board) -> PlacementResult<()> {
    for &(x, y) in state.cells().iter() {
        if board.is_out_of_bounds(x, y) {
            return Err(PlacementError::OutOfBounds { x, y });
        }
        if board.is_occupied(x, y) {
            return Err(PlacementError::Overlap { x, y });
        }
    }
    if !is_supported(state, board) {
        return Err(PlacementError::Unsupported);
    }
    Ok(())
}

/// Lock `state` onto a (cloned) board, applying line clears. The caller
/// supplies the T-spin classification (computed from the movement that led
/// here, which `Board`/`Placement` alone don't retain).
pub fn place(
    state: &PieceState,
    board: &Board,
    spin: SpinStatus,
) -> PlacementResult<(Board, Placement)> {
    check_legal(state, board)?;

    let mut next_board = board.clone();
    let locked = next_board.lock_piece(&state.shape(), state.x, state.y, state.kind);
    debug_assert!(locked, "check_legal already validated this placement");

    let cleared_rows = next_board.clear_full_rows();

    Ok((
        next_board,
        Placement {
            kind: state.kind,
            final_state: *state,
            spin,
            cleared_rows,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghost_drop_lands_on_floor() {
        let board = Board::new();
        let spawn = PieceState::spawn(PieceKind::O);
        let landed = ghost_drop(&spawn, &board);
        assert!(is_supported(&landed, &board));
        assert_eq!(landed.x, spawn.x);
    }

    #[test]
    fn ghost_drop_lands_on_stack() {
        let mut board = Board::new();
        let bottom = board.height() as i8 - 1;
        for x in 0..board.width() as i8 {
            board.set(x, bottom, Some(PieceKind::L));
        }
        let spawn = PieceState::spawn(PieceKind::O);
        let landed = ghost_drop(&spawn, &board);
        // Landed piece must rest directly above the filled floor row.
        assert!(is_supported(&landed, &board));
        for &(_, y) in landed.cells().iter() {
            assert!(y < bottom);
        }
    }

    #[test]
    fn place_clears_completed_rows() {
        let mut board = Board::new();
        let bottom = board.height() as i8 - 1;
        for x in 0..board.width() as i8 {
            if x != 0 && x != 1 {
                board.set(x, bottom, Some(PieceKind::L));
            }
        }
        let state = PieceState {
            kind: PieceKind::O,
            rotation: Rotation::North,
            x: 0,
            y: bottom - 1,
        };
        let (_, placement) = place(&state, &board, SpinStatus::None).unwrap();
        assert_eq!(placement.cleared_rows.as_slice(), &[bottom]);
    }

    #[test]
    fn place_rejects_unsupported_state() {
        let board = Board::new();
        let floating = PieceState {
            kind: PieceKind::O,
            rotation: Rotation::North,
            x: 0,
            y: 0,
        };
        assert!(check_legal(&floating, &board).is_err());
    }
}
