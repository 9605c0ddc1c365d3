//! Client-facing error type for the bot boundary — §7.
//!
//! Mirrors `trilltino-XFChess`'s `chess_engine::error` style: one variant
//! per failure cause, `thiserror`-derived messages, a `Result<T, E>` alias.
//! Per §7 there is no partial error from the client's point of view once a
//! handle exists (a bot is alive-and-progressing or `dead`); the only
//! synchronous misuse this boundary rejects is a malformed board encoding.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BotError {
    #[error("board encoding must carry exactly {expected} cells, got {actual}")]
    BoardSizeMismatch { expected: usize, actual: usize },
}

pub type BotResult<T> = Result<T, BotError>;
