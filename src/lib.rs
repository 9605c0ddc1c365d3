//! Asynchronous, search-based move-selection core for guideline Tetris.
//!
//! This crate wraps [`cold_clear_core`]'s board/kinematics/move generator,
//! [`cold_clear_eval`]'s static and reward evaluation, and
//! [`cold_clear_tree`]'s best-first search tree behind the client boundary
//! described by the external interface: [`launch`]/[`launch_with_board`]
//! spin up a [`Bot`] backed by one or more expansion threads; feed it
//! pieces with [`Bot::add_next_piece`], ask for a move with
//! [`Bot::request_next_move`], and read the answer with
//! [`Bot::poll_next_move`] or [`Bot::block_next_move`].

mod board_codec;
mod command;
mod error;
mod interface;
mod options;
mod worker;

pub use cold_clear_eval::Weights;
pub use cold_clear_types::{MovementMode, MovementToken, PcLoop, PieceKind, SpawnRule, SpinStatus};

pub use board_codec::{decode, encode};
pub use error::{BotError, BotResult};
pub use interface::{launch, launch_with_board, Bot, Move, Plan, PlanStep, PollResult, PLAN_LEN};
pub use options::Options;
