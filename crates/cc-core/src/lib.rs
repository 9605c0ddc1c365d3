//! Board model, piece kinematics, and move generation — §4.1/§4.2/§4.4.

pub mod bag;
pub mod board;
pub mod error;
pub mod moves;
pub mod pieces;
pub mod placement;
pub mod tspin;

pub use bag::{AddOutcome, Bag, Queue};
pub use board::Board;
pub use error::{PlacementError, PlacementResult};
pub use moves::{generate, CandidateMove, Path};
pub use pieces::{get_kick_table, get_shape, get_spawn_shape, try_rotate, KickTable, MinoOffset, PieceShape};
pub use placement::{check_legal, ghost_drop, is_supported, place, Placement, PieceState};
