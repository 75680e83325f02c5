//! Move orchestration: one turn = a synchronous sweep plus the join of every
//! relocation it scheduled.

use std::collections::BTreeMap;

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::{self as GameEngine, BoardState, Move, Score, Step, TileId};
use crate::error::GridError;
use crate::host::{AnimationHost, Completion, InstantHost};
use crate::layout::Layout;

/// A board together with its score, geometry, randomness and animation host.
pub struct Grid<H = InstantHost> {
    board: BoardState,
    score: Score,
    layout: Layout,
    host: H,
    rng: StdRng,
}

impl<H: AnimationHost> Grid<H> {
    /// An empty `size` x `size` grid. Call [`Grid::reset`] or
    /// [`Grid::add_random_tile`] to put the first tile down. Fails with
    /// `InvalidSize` if the board does not fit `layout` in `u32` pixels.
    pub fn new(size: usize, layout: Layout, host: H, rng: StdRng) -> Result<Self, GridError> {
        if layout.checked_display_size(size).is_none() {
            return Err(GridError::InvalidSize(size));
        }
        Ok(Self {
            board: BoardState::new(size)?,
            score: Score::default(),
            layout,
            host,
            rng,
        })
    }

    /// Like [`Grid::new`] with an RNG seeded from `seed`.
    pub fn seeded(size: usize, layout: Layout, host: H, seed: u64) -> Result<Self, GridError> {
        Self::new(size, layout, host, StdRng::seed_from_u64(seed))
    }

    /// Start from an existing arrangement of row-major values (`0` = empty).
    /// Tiles are laid out on their cells.
    pub fn from_values(values: &[u32], layout: Layout, host: H, rng: StdRng) -> Result<Self, GridError> {
        let template = BoardState::from_values(values)?;
        let mut grid = Self::new(template.size(), layout, host, rng)?;
        for (index, value) in template.values().into_iter().enumerate() {
            if value != 0 {
                grid.place_tile(index, value)?;
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score.value()
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Edge length of the board in pixels.
    #[inline]
    pub fn display_size(&self) -> u32 {
        self.layout.display_size(self.board.size())
    }

    #[inline]
    pub fn cell_position(&self, p: usize) -> u32 {
        self.layout.cell_position(p)
    }

    pub fn is_game_over(&self) -> bool {
        GameEngine::is_game_over(&self.board)
    }

    pub fn can_move(&self, mv: Move) -> bool {
        GameEngine::can_move(&self.board, mv)
    }

    /// Drop a minimum-value tile into a uniformly random empty cell.
    pub fn add_random_tile(&mut self) -> Result<TileId, GridError> {
        let id = GameEngine::spawn_tile(&mut self.board, &self.layout, &mut self.rng)?;
        self.announce_spawn(id);
        Ok(id)
    }

    /// Put a tile of `value` on the empty cell `index`.
    pub fn place_tile(&mut self, index: usize, value: u32) -> Result<TileId, GridError> {
        let position = self.layout.cell_origin(index, self.board.size());
        let id = self.board.place(index, value, position)?;
        self.announce_spawn(id);
        Ok(id)
    }

    /// Discard every tile, zero the score and spawn one fresh tile.
    pub fn reset(&mut self) -> Result<TileId, GridError> {
        for id in self.board.clear() {
            self.host.tile_removed(id);
        }
        self.score.reset();
        self.add_random_tile()
    }

    /// Validate a `(dx, dy)` vector and play the turn. Nothing is touched when
    /// the vector is rejected.
    pub async fn shift_vector(&mut self, dx: i32, dy: i32) -> Result<bool, GridError> {
        let mv = Move::from_vector(dx, dy)?;
        Ok(self.shift(mv).await)
    }

    /// Play one turn in `mv`.
    ///
    /// Board, locks and score are updated before the first relocation is
    /// scheduled. All relocations then run at once and each one settles as it
    /// completes; the future resolves after the last of them, so a `true`
    /// result always comes with a fully settled board. Resolves to `false`
    /// without scheduling anything if the direction changes nothing.
    ///
    /// Dropping the future mid-turn settles every outstanding step on the
    /// spot; the board is never left with locked tiles.
    pub async fn shift(&mut self, mv: Move) -> bool {
        let steps = GameEngine::sweep(&mut self.board, &mut self.score, mv);
        if steps.is_empty() {
            debug!("{mv:?} changes nothing");
            return false;
        }
        debug!(
            "{mv:?}: {} relocation(s), {} merge(s), score {}",
            steps.len(),
            steps.iter().filter(|s| s.is_merge()).count(),
            self.score.value()
        );
        self.relocate_all(steps).await;
        true
    }

    /// Hand every step to the host and settle each one as its relocation
    /// reports back.
    async fn relocate_all(&mut self, steps: Vec<Step>) {
        let mut turn = Unsettled {
            steps: steps.iter().map(|s| (s.tile, *s)).collect(),
            grid: self,
        };
        let mut pending = FuturesUnordered::new();
        for step in &steps {
            let tile = step.tile;
            match turn.grid.schedule(step) {
                Some(done) => pending.push(async move {
                    if done.await.is_err() {
                        warn!("host dropped the completion of tile {tile}; settling it anyway");
                    }
                    tile
                }),
                None => {
                    warn!("tile {tile} vanished before its relocation was scheduled; settling it in place");
                    turn.settle(tile);
                }
            }
        }

        while let Some(tile) = pending.next().await {
            turn.settle(tile);
        }
    }

    fn schedule(&self, step: &Step) -> Option<Completion> {
        let tile = self.board.tile(step.tile)?;
        let to = self.layout.cell_origin(step.to, self.board.size());
        Some(self.host.relocate(tile, to, self.layout.tween_duration(step.distance)))
    }

    fn settle_step(&mut self, step: &Step) {
        let to = self.layout.cell_origin(step.to, self.board.size());
        if let Some(tile) = self.board.tile_mut(step.tile) {
            tile.set_position(to);
        }
        if let Some(absorbed) = GameEngine::complete(&mut self.board, step) {
            self.host.tile_removed(absorbed.id());
            if let Some(tile) = self.board.tile(step.tile) {
                self.host.tile_upgraded(tile);
            }
        }
    }

    fn announce_spawn(&self, id: TileId) {
        if let Some(tile) = self.board.tile(id) {
            self.host.tile_spawned(tile);
        }
    }
}

/// Steps of a turn whose relocations have not reported back yet.
struct Unsettled<'a, H: AnimationHost> {
    grid: &'a mut Grid<H>,
    steps: BTreeMap<TileId, Step>,
}

impl<H: AnimationHost> Unsettled<'_, H> {
    fn settle(&mut self, tile: TileId) {
        if let Some(step) = self.steps.remove(&tile) {
            self.grid.settle_step(&step);
        }
    }
}

impl<H: AnimationHost> Drop for Unsettled<'_, H> {
    fn drop(&mut self) {
        if self.steps.is_empty() {
            return;
        }
        warn!(
            "turn abandoned with {} relocation(s) in flight; settling them now",
            self.steps.len()
        );
        for step in std::mem::take(&mut self.steps).into_values() {
            self.grid.settle_step(&step);
        }
    }
}
