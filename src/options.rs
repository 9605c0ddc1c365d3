//! Bot configuration — §6 `options` fields.

use cold_clear_types::{MovementMode, PcLoop, SpawnRule};
use serde::{Deserialize, Serialize};

/// Settings a client supplies to `launch`/`launch_with_board`. Fixed for
/// the lifetime of a handle; `reset` keeps them, it only replaces board
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    pub mode: MovementMode,
    pub spawn_rule: SpawnRule,
    pub use_hold: bool,
    pub speculate: bool,
    /// Expand at least this many nodes before a pending move request is
    /// allowed to commit. `0` means "commit as soon as the root has been
    /// expanded once".
    pub min_nodes: u32,
    /// Stop expanding (idle until the next command) once the tree holds
    /// this many nodes.
    pub max_nodes: u32,
    pub threads: u32,
    pub pcloop: PcLoop,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: MovementMode::ZeroG,
            spawn_rule: SpawnRule::Row19Or20,
            use_hold: true,
            speculate: true,
            min_nodes: 0,
            max_nodes: 1_000_000,
            threads: 1,
            pcloop: PcLoop::Off,
        }
    }
}
