//! Error type shared by the board, the spawner and the turn gate.

use thiserror::Error;

/// Everything that can go wrong when driving a [`Grid`](crate::Grid) or a
/// [`Session`](crate::Session).
///
/// None of these leave the board half-updated: every check runs before the
/// first mutation of the operation that reports it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// The vector is not one of the four unit directions.
    #[error("invalid direction vector ({dx}, {dy}); expected exactly one axis of magnitude 1")]
    InvalidDirection { dx: i32, dy: i32 },

    /// A tile was requested but every cell is occupied.
    #[error("no empty cell left on the board")]
    NoEmptyCell,

    /// A move (or reset) arrived while the previous turn was still animating.
    #[error("a turn is already in progress")]
    ConcurrentMoveRejected,

    #[error("invalid board size {0}")]
    InvalidSize(usize),

    /// Tile values are powers of two from 2 up to 2^31.
    #[error("invalid tile value {0}")]
    InvalidValue(u32),

    #[error("cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("cell index {0} is outside the board")]
    IndexOutOfBounds(usize),
}
