//! Fallible-boundary error types for the board/kinematics layer, in the
//! style of `trilltino-XFChess`'s `chess_engine::error` (one variant per
//! failure cause, `thiserror`-derived messages).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("piece cell ({x}, {y}) is out of bounds")]
    OutOfBounds { x: i8, y: i8 },

    #[error("piece cell ({x}, {y}) overlaps an occupied cell")]
    Overlap { x: i8, y: i8 },

    #[error("piece is not supported and cannot lock in place")]
    Unsupported,
}

pub type PlacementResult<T> = Result<T, PlacementError>;
