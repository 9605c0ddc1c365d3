//! Arena node — §4.5.

use cold_clear_core::{Bag, Board, Path, Placement};
use cold_clear_types::PieceKind;

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A node where a specific piece is known to be in play. `piece` is
    /// always `Some` for this kind.
    Decision,
    /// A node where the next piece is unknown; its children are one
    /// `Decision` node per piece still in `Node::bag`, weighted equally.
    Chance,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: u32,

    /// Resulting board at this node (after the placement that produced it,
    /// or the root's starting board).
    pub board: Board,
    pub held: Option<PieceKind>,
    /// The bag remaining after this node's own piece (if any) was drawn
    /// from it — the set a `Chance` node here would speculate over.
    pub bag: Bag,
    pub b2b: bool,
    pub combo: u32,

    /// `Decision`: the piece controlled at this node. `Chance`: `None`.
    pub piece: Option<PieceKind>,

    /// The input path and resulting lock, from the parent's board to this
    /// node's board. `None` for the root and for `Chance` nodes (no board
    /// change happens at the chance step itself).
    pub path: Option<Path>,
    pub placement: Option<Placement>,
    pub used_hold: bool,

    pub reward_from_parent: i64,
    pub static_value: i64,
    pub backed_value: i64,

    pub busy: bool,
    pub dead: bool,
    pub expanded: bool,
}

impl Node {
    pub fn root(board: Board, piece: PieceKind, held: Option<PieceKind>, bag: Bag, b2b: bool, combo: u32, static_value: i64) -> Self {
        Self {
            kind: NodeKind::Decision,
            parent: None,
            children: Vec::new(),
            depth: 0,
            board,
            held,
            bag,
            b2b,
            combo,
            piece: Some(piece),
            path: None,
            placement: None,
            used_hold: false,
            reward_from_parent: 0,
            static_value,
            backed_value: static_value,
            busy: false,
            dead: false,
            expanded: false,
        }
    }
}
