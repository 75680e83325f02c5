//! Engine module: arena-backed NxN board, the per-tile sweep resolver and
//! the synchronous half of a turn. Nothing in here awaits; the asynchronous
//! relocation half lives in [`crate::grid`].
//!
//! - `BoardState` owns occupancy and the tile arena.
//! - `sweep` commits one direction's moves, `apply` also finishes them.
//! - `spawn_tile` drops a minimum-value tile into a random empty cell.

mod score;
mod spawn;
pub mod state;
mod sweep;

pub use score::Score;
pub use spawn::{pick_empty_cell, spawn_tile};
pub use state::{BoardState, Move, Tile, TileId, MAX_BOARD_SIZE, MAX_TILE_VALUE, MIN_TILE_VALUE};
pub use sweep::{apply, can_move, is_game_over, resolve, scan_order, sweep, Resolution, Step};

pub(crate) use sweep::complete;
