use rand::seq::SliceRandom;
use rand::Rng;

use super::state::{BoardState, TileId, MIN_TILE_VALUE};
use crate::error::GridError;
use crate::layout::Layout;

/// Uniformly random empty cell, or `NoEmptyCell` on a full board.
pub fn pick_empty_cell<R: Rng + ?Sized>(board: &BoardState, rng: &mut R) -> Result<usize, GridError> {
    board
        .empty_indices()
        .choose(rng)
        .copied()
        .ok_or(GridError::NoEmptyCell)
}

/// Place a minimum-value tile in a random empty cell, positioned on its cell.
pub fn spawn_tile<R: Rng + ?Sized>(
    board: &mut BoardState,
    layout: &Layout,
    rng: &mut R,
) -> Result<TileId, GridError> {
    let index = pick_empty_cell(board, rng)?;
    let position = layout.cell_origin(index, board.size());
    board.place(index, MIN_TILE_VALUE, position)
}
