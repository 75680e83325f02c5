//! The turn gate an input layer puts in front of a [`Grid`].
//!
//! A session owns the grid behind an async mutex. Whoever holds the lock is
//! playing a turn; anyone else asking to move or reset in the meantime gets
//! [`GridError::ConcurrentMoveRejected`] instead of being queued.

use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex;

use crate::engine::{Move, TileId};
use crate::error::GridError;
use crate::grid::Grid;
use crate::host::{AnimationHost, InstantHost};

/// What one accepted turn did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    /// At least one tile changed cell or merged.
    pub moved: bool,
    /// Score once every relocation settled.
    pub score: u64,
    /// Tile spawned after the turn, only when `moved`.
    pub spawned: Option<TileId>,
}

/// Cloneable handle; clones share the same grid and gate.
pub struct Session<H = InstantHost> {
    grid: Arc<Mutex<Grid<H>>>,
}

impl<H> Clone for Session<H> {
    fn clone(&self) -> Self {
        Self {
            grid: Arc::clone(&self.grid),
        }
    }
}

impl<H: AnimationHost> Session<H> {
    pub fn new(grid: Grid<H>) -> Self {
        Self {
            grid: Arc::new(Mutex::new(grid)),
        }
    }

    /// Play a turn and, if it changed the board, spawn a tile once every
    /// relocation has settled. A turn whose future is dropped early releases
    /// the gate with its steps settled and spawns nothing.
    pub async fn play(&self, mv: Move) -> Result<TurnOutcome, GridError> {
        let mut grid = self
            .grid
            .try_lock()
            .map_err(|_| GridError::ConcurrentMoveRejected)?;
        let moved = grid.shift(mv).await;
        let spawned = if moved { Some(grid.add_random_tile()?) } else { None };
        debug!("turn {mv:?}: moved={moved} score={}", grid.score());
        Ok(TurnOutcome {
            moved,
            score: grid.score(),
            spawned,
        })
    }

    /// [`Session::play`] for a raw `(dx, dy)` vector.
    pub async fn play_vector(&self, dx: i32, dy: i32) -> Result<TurnOutcome, GridError> {
        let mv = Move::from_vector(dx, dy)?;
        self.play(mv).await
    }

    /// Start a new game. Rejected while a turn is in flight.
    pub fn reset(&self) -> Result<TileId, GridError> {
        let mut grid = self
            .grid
            .try_lock()
            .map_err(|_| GridError::ConcurrentMoveRejected)?;
        grid.reset()
    }

    #[inline]
    pub fn is_turn_in_progress(&self) -> bool {
        self.grid.try_lock().is_err()
    }

    /// Wait for any turn in flight, then read the score.
    pub async fn score(&self) -> u64 {
        self.grid.lock().await.score()
    }

    pub async fn is_game_over(&self) -> bool {
        self.grid.lock().await.is_game_over()
    }

    /// Run `f` against the grid once no turn is in flight.
    pub async fn inspect<R>(&self, f: impl FnOnce(&Grid<H>) -> R) -> R {
        let grid = self.grid.lock().await;
        f(&grid)
    }
}
