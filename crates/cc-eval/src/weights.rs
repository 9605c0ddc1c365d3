//! Caller-supplied evaluator weights — §4.3/§6.
//!
//! Every field named by the distilled spec's `weights` table is present.
//! `serde` derives let a host application load/store these however it
//! likes; this crate never reads a weights file itself.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    pub back_to_back: i32,
    pub bumpiness: i32,
    pub bumpiness_sq: i32,
    pub row_transitions: i32,
    pub height: i32,
    pub top_half: i32,
    pub top_quarter: i32,
    pub jeopardy: i32,
    pub cavity_cells: i32,
    pub cavity_cells_sq: i32,
    pub overhang_cells: i32,
    pub overhang_cells_sq: i32,
    pub covered_cells: i32,
    pub covered_cells_sq: i32,
    pub tslot: [i32; 4],
    pub well_depth: i32,
    pub max_well_depth: i32,
    pub well_column: [i32; 10],
    pub b2b_clear: i32,
    pub clear1: i32,
    pub clear2: i32,
    pub clear3: i32,
    pub clear4: i32,
    pub tspin1: i32,
    pub tspin2: i32,
    pub tspin3: i32,
    pub mini_tspin1: i32,
    pub mini_tspin2: i32,
    pub perfect_clear: i32,
    pub combo_garbage: i32,
    pub move_time: i32,
    pub wasted_t: i32,
    pub use_bag: bool,
    pub timed_jeopardy: bool,
    pub stack_pc_damage: bool,
}

impl Default for Weights {
    /// Values in the same rough proportions the upstream Cold Clear engine
    /// ships as a default profile: heavily punish bumpiness/holes, reward
    /// T-spins and back-to-back quads, lightly punish height and move time.
    fn default() -> Self {
        Self {
            back_to_back: 52,
            bumpiness: -24,
            bumpiness_sq: -7,
            row_transitions: -5,
            height: -39,
            top_half: -150,
            top_quarter: -511,
            jeopardy: -11,
            cavity_cells: -173,
            cavity_cells_sq: -3,
            overhang_cells: -34,
            overhang_cells_sq: -1,
            covered_cells: -17,
            covered_cells_sq: -1,
            tslot: [8, 148, 276, 505],
            well_depth: 57,
            max_well_depth: 17,
            well_column: [20, 23, 20, 50, 59, 59, 50, 20, 23, 20],
            b2b_clear: 52,
            clear1: -150,
            clear2: -100,
            clear3: -58,
            clear4: 390,
            tspin1: 130,
            tspin2: 400,
            tspin3: 700,
            mini_tspin1: 0,
            mini_tspin2: -150,
            perfect_clear: 999,
            combo_garbage: 150,
            move_time: -3,
            wasted_t: -150,
            use_bag: true,
            timed_jeopardy: true,
            stack_pc_damage: false,
        }
    }
}
