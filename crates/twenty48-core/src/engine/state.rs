use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::layout::Point;

/// Value of every freshly spawned tile.
pub const MIN_TILE_VALUE: u32 = 2;
/// Largest representable tile; two of these never merge.
pub const MAX_TILE_VALUE: u32 = 1 << 31;
/// Largest supported edge length.
pub const MAX_BOARD_SIZE: usize = 64;

pub(crate) const DEPTH_RESTING: u8 = 1;
pub(crate) const DEPTH_ABSORBED: u8 = 2;
pub(crate) const DEPTH_INCOMING: u8 = 3;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Map a `(dx, dy)` unit vector onto a direction.
    ///
    /// ```
    /// use twenty48_core::{GridError, Move};
    /// assert_eq!(Move::from_vector(1, 0), Ok(Move::Right));
    /// assert_eq!(
    ///     Move::from_vector(1, 1),
    ///     Err(GridError::InvalidDirection { dx: 1, dy: 1 })
    /// );
    /// ```
    pub fn from_vector(dx: i32, dy: i32) -> Result<Self, GridError> {
        match (dx, dy) {
            (0, -1) => Ok(Move::Up),
            (0, 1) => Ok(Move::Down),
            (-1, 0) => Ok(Move::Left),
            (1, 0) => Ok(Move::Right),
            _ => Err(GridError::InvalidDirection { dx, dy }),
        }
    }

    /// The `(dx, dy)` unit vector, with y growing downwards.
    #[inline]
    pub fn vector(self) -> (i32, i32) {
        match self {
            Move::Up => (0, -1),
            Move::Down => (0, 1),
            Move::Left => (-1, 0),
            Move::Right => (1, 0),
        }
    }
}

/// Stable handle of a tile for its whole lifetime, including the window where
/// it is being absorbed by a merge and no longer sits in any cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u64);

impl TileId {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single numbered tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    value: u32,
    upgrading: bool,
    position: Point,
    depth: u8,
}

impl Tile {
    pub(crate) fn new(id: TileId, value: u32, position: Point) -> Self {
        Self {
            id,
            value,
            upgrading: false,
            position,
            depth: DEPTH_RESTING,
        }
    }

    #[inline]
    pub fn id(&self) -> TileId {
        self.id
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Display coordinate of the tile's top-left corner. Lags behind the
    /// board while a relocation is in flight.
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Stacking order; the incoming tile of a merge is drawn above its target.
    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// True while the tile takes part in a merge that has not finished playing.
    #[inline]
    pub fn is_upgrading(&self) -> bool {
        self.upgrading
    }

    #[inline]
    pub fn can_upgrade(&self) -> bool {
        !self.upgrading
    }

    pub(crate) fn mark_upgrading(&mut self) {
        self.upgrading = true;
    }

    pub(crate) fn set_depth(&mut self, depth: u8) {
        self.depth = depth;
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Double the value and release the merge lock.
    pub(crate) fn upgrade(&mut self) {
        debug_assert!(self.value < MAX_TILE_VALUE);
        self.value = self.value.checked_mul(2).unwrap_or(MAX_TILE_VALUE);
        self.upgrading = false;
    }
}

/// Occupancy of an NxN board.
///
/// Cells are row-major (`index = x + size * y`) and hold at most one
/// [`TileId`]. Tiles live in an arena keyed by id; a tile that is being
/// absorbed by an in-flight merge stays in the arena until its relocation
/// settles but is no longer referenced by any cell.
#[derive(Clone, Debug)]
pub struct BoardState {
    size: usize,
    cells: Vec<Option<TileId>>,
    tiles: BTreeMap<TileId, Tile>,
    next_id: u64,
}

impl BoardState {
    /// An empty `size` x `size` board, `1..=MAX_BOARD_SIZE` wide.
    pub fn new(size: usize) -> Result<Self, GridError> {
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(GridError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
            tiles: BTreeMap::new(),
            next_id: 0,
        })
    }

    /// Build a board from row-major tile values, `0` meaning empty.
    ///
    /// The number of values must be a perfect square. Positions are left at
    /// the origin; callers that display the board lay the tiles out themselves.
    ///
    /// ```
    /// use twenty48_core::engine::BoardState;
    /// let board = BoardState::from_values(&[2, 0, 0, 4]).unwrap();
    /// assert_eq!(board.size(), 2);
    /// assert_eq!(board.count_empty(), 2);
    /// ```
    pub fn from_values(values: &[u32]) -> Result<Self, GridError> {
        let size = (1..=values.len())
            .find(|n| n * n >= values.len())
            .unwrap_or(0);
        if size * size != values.len() {
            return Err(GridError::InvalidSize(values.len()));
        }
        let mut board = Self::new(size)?;
        for (index, &value) in values.iter().enumerate() {
            if value != 0 {
                board.place(index, value, Point::default())?;
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        x + self.size * y
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.size, index / self.size)
    }

    /// The adjacent cell in direction `mv`, or `None` past the wall.
    pub fn neighbour(&self, x: usize, y: usize, mv: Move) -> Option<(usize, usize)> {
        let (dx, dy) = mv.vector();
        let nx = x.checked_add_signed(dx as isize)?;
        let ny = y.checked_add_signed(dy as isize)?;
        (nx < self.size && ny < self.size).then_some((nx, ny))
    }

    #[inline]
    pub fn id_at(&self, index: usize) -> Option<TileId> {
        self.cells.get(index).copied().flatten()
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Option<&Tile> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.id_at(self.index(x, y)).and_then(|id| self.tiles.get(&id))
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    /// Every live tile, including tiles being absorbed by an unfinished merge.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.values()
    }

    /// Number of occupied cells.
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.is_none().then_some(i))
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Put a new tile into an empty cell. `value` must be a power of two of
    /// at least [`MIN_TILE_VALUE`].
    pub fn place(&mut self, index: usize, value: u32, position: Point) -> Result<TileId, GridError> {
        if value < MIN_TILE_VALUE || !value.is_power_of_two() {
            return Err(GridError::InvalidValue(value));
        }
        match self.cells.get(index) {
            None => return Err(GridError::IndexOutOfBounds(index)),
            Some(Some(_)) => return Err(GridError::CellOccupied(index)),
            Some(None) => {}
        }
        let id = TileId(self.next_id);
        self.next_id += 1;
        self.tiles.insert(id, Tile::new(id, value, position));
        self.cells[index] = Some(id);
        Ok(id)
    }

    /// Move the reference in `from` to `to` and clear `from`. Returns the id
    /// that previously occupied `to`; that tile stays in the arena.
    pub(crate) fn relocate(&mut self, from: usize, to: usize) -> Option<TileId> {
        let moving = self.cells[from].take();
        std::mem::replace(&mut self.cells[to], moving)
    }

    /// Drop a tile from the arena.
    pub(crate) fn discard(&mut self, id: TileId) -> Option<Tile> {
        self.tiles.remove(&id)
    }

    /// Empty every cell and the arena, returning the ids that were live.
    pub(crate) fn clear(&mut self) -> Vec<TileId> {
        self.cells.iter_mut().for_each(|c| *c = None);
        let ids = self.tiles.keys().copied().collect();
        self.tiles.clear();
        ids
    }

    /// Row-major tile values, `0` for empty cells.
    pub fn values(&self) -> Vec<u32> {
        self.cells
            .iter()
            .map(|c| c.and_then(|id| self.tiles.get(&id)).map_or(0, Tile::value))
            .collect()
    }

    /// Highest value sitting in a cell, `0` on an empty board.
    pub fn highest_tile(&self) -> u32 {
        self.values().into_iter().max().unwrap_or(0)
    }

    /// No merge is pending: nothing is locked and every live tile sits in a cell.
    pub fn is_settled(&self) -> bool {
        self.tiles.len() == self.tile_count() && self.tiles.values().all(Tile::can_upgrade)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(self.size * 8 - 1);
        for y in 0..self.size {
            if y > 0 {
                writeln!(f, "{separator}")?;
            }
            let row: Vec<String> = (0..self.size)
                .map(|x| format_val(self.tile_at(x, y).map(Tile::value)))
                .collect();
            writeln!(f, "{}", row.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: Option<u32>) -> String {
    match val {
        None => String::from("       "),
        Some(v) => format!("{v:^7}"),
    }
}
