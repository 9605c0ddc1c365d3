//! Best-first search tree and engine — §4.5.

pub mod node;
pub mod tree;

pub use node::{Node, NodeId, NodeKind};
pub use tree::{CommitResult, Tree};
