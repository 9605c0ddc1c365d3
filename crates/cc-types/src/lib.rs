//! Shared data types for the Cold Clear search core.
//!
//! This crate mirrors `tui-tetris-types`: pure data shared by every other
//! crate in the workspace. It carries one dependency, `serde`, so that
//! `Options` in the root crate can derive `Serialize`/`Deserialize` over
//! the mode/spawn-rule/pcloop enums defined here.

use serde::{Deserialize, Serialize};

/// Board is 10 columns wide.
pub const BOARD_WIDTH: u8 = 10;

/// Board is 40 rows tall: the bottom 20 rows are the visible playfield, the
/// top 20 rows are buffer space above it (pieces can spawn and topple into
/// the buffer before locking).
pub const BOARD_HEIGHT: u8 = 40;

/// Height of the visible playfield, i.e. the part of the board a client
/// sees and the part the 400-bool board-encoding boundary covers.
pub const VISIBLE_HEIGHT: u8 = 20;

/// Longest movement path the move generator or a `Move` may carry.
pub const MAX_MOVEMENTS: usize = 32;

/// Cells in the client-visible board encoding (`VISIBLE_HEIGHT * BOARD_WIDTH`).
pub const BOARD_CELLS: usize = VISIBLE_HEIGHT as usize * BOARD_WIDTH as usize;

/// One of the seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "I" => Some(PieceKind::I),
            "O" => Some(PieceKind::O),
            "T" => Some(PieceKind::T),
            "S" => Some(PieceKind::S),
            "Z" => Some(PieceKind::Z),
            "J" => Some(PieceKind::J),
            "L" => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Rotation states; `North` is the spawn orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub fn rotate_cw(self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    pub fn rotate_ccw(self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Classification of a placement as a T-spin, mini T-spin, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinStatus {
    None,
    Mini,
    Full,
}

impl SpinStatus {
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            SpinStatus::None => None,
            SpinStatus::Mini => Some("mini"),
            SpinStatus::Full => Some("full"),
        }
    }
}

/// A single input taken while steering a piece from spawn to its final
/// locked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementToken {
    Left,
    Right,
    Cw,
    Ccw,
    Drop,
}

/// Movement alphabet permitted by the move generator, per §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementMode {
    /// Rotate at spawn only, then a single hard drop.
    HardDropOnly,
    /// Full alphabet with single-cell soft-drop steps enabling tucks/spins.
    ZeroG,
    /// Like `ZeroG`, but every horizontal move is followed by a maximal
    /// fall, as under 20G gravity.
    TwentyG,
}

/// Where newly appearing pieces are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnRule {
    /// Guideline-standard: piece appears on row 19/20; blocked spawn is a
    /// loss.
    Row19Or20,
    /// Piece appears above the field and falls in; extra paths may open up
    /// through holes in the stack.
    Row21AndFall,
}

/// Perfect-clear seeking behavior, named but left undefined by the
/// distilled spec; see `SPEC_FULL.md` §4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PcLoop {
    Off,
    Fastest,
    Attack,
}

/// A cell on the board: `None` is empty, `Some(kind)` is filled by that
/// piece kind (used for diagnostics/rendering; the search core itself only
/// needs filled/empty).
pub type Cell = Option<PieceKind>;
