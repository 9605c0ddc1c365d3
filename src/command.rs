//! The command inbox — §5 "Commands from the client observe FIFO order
//! relative to each other."
//!
//! A single `crossbeam_channel` MPSC channel feeds a dedicated coordinator
//! thread (see `worker::run_coordinator`) that applies commands to the
//! shared state one at a time, under the tree lock. Expansion threads never
//! touch this channel; they only watch the state it produces.

use cold_clear_core::Board;
use cold_clear_types::PieceKind;

#[derive(Debug, Clone)]
pub enum Command {
    AddNextPiece(PieceKind),
    RequestNextMove { incoming_garbage: i32 },
    /// A barrier: §9(a) resolves the open question by clearing queue and
    /// hold along with the board, since `reset`'s signature carries only
    /// `field/b2b/combo`.
    Reset { board: Board, b2b: bool, combo: u32 },
    Terminate,
}
