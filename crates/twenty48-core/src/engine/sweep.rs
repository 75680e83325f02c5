use super::score::Score;
use super::state::{BoardState, Move, Tile, TileId, DEPTH_ABSORBED, DEPTH_INCOMING, MAX_TILE_VALUE};

/// Where one tile ends up for a given direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Blocked where it stands.
    Stay,
    /// Slides into the empty cell `to`.
    Slide { to: usize },
    /// Lands on the equal, unlocked tile occupying `to`.
    Merge { to: usize },
}

/// One committed relocation of a sweep.
///
/// Occupancy, locks and score are already final when a `Step` exists; only
/// the part that has to wait for the animation (doubling the survivor and
/// dropping `absorbed`) is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub tile: TileId,
    pub from: usize,
    pub to: usize,
    /// Tile that was sitting on `to` and is consumed by this merge.
    pub absorbed: Option<TileId>,
    /// Chebyshev distance in cells.
    pub distance: usize,
    /// Score credited when the step was committed, `0` for a slide.
    pub gained: u32,
}

impl Step {
    #[inline]
    pub fn is_merge(&self) -> bool {
        self.absorbed.is_some()
    }
}

/// Cells in the order a sweep visits them: the wall the tiles travel towards
/// comes first, so tiles already pushed against it are settled before the
/// tiles behind them look for room. Outer loop runs over columns.
pub fn scan_order(size: usize, mv: Move) -> impl Iterator<Item = (usize, usize)> {
    let (dx, dy) = mv.vector();
    (0..size).flat_map(move |i| {
        let x = if dx > 0 { size - 1 - i } else { i };
        (0..size).map(move |j| {
            let y = if dy > 0 { size - 1 - j } else { j };
            (x, y)
        })
    })
}

/// Farthest reachable cell for the tile at `(x, y)`.
///
/// Walks along `mv` over empty cells. If the first occupied cell after that
/// run holds a tile of equal value and neither tile is locked, the tile merges
/// into it; otherwise it stops on the last empty cell. A locked tile is never
/// a merge target, which is what keeps every tile to one merge per sweep.
/// Tiles at [`MAX_TILE_VALUE`] do not merge.
pub fn resolve(board: &BoardState, x: usize, y: usize, mv: Move) -> Resolution {
    let Some(tile) = board.tile_at(x, y) else {
        return Resolution::Stay;
    };

    let (mut fx, mut fy) = (x, y);
    while let Some((nx, ny)) = board.neighbour(fx, fy, mv) {
        match board.tile_at(nx, ny) {
            None => {
                (fx, fy) = (nx, ny);
            }
            Some(other) => {
                if other.value() == tile.value()
                    && tile.value() < MAX_TILE_VALUE
                    && other.can_upgrade()
                    && tile.can_upgrade()
                {
                    return Resolution::Merge { to: board.index(nx, ny) };
                }
                break;
            }
        }
    }

    if (fx, fy) == (x, y) {
        Resolution::Stay
    } else {
        Resolution::Slide { to: board.index(fx, fy) }
    }
}

/// Run the synchronous half of a turn.
///
/// Every tile that can move is committed in scan order: its id is written to
/// the destination and cleared from the origin, and on a merge both tiles are
/// locked, the incoming tile is raised above its target and `score` is
/// credited with the incoming tile's current value. Returns the committed
/// steps; an empty vector means the direction changes nothing.
pub fn sweep(board: &mut BoardState, score: &mut Score, mv: Move) -> Vec<Step> {
    let mut steps = Vec::new();
    for (x, y) in scan_order(board.size(), mv) {
        let tile = match board.tile_at(x, y) {
            Some(t) if t.can_upgrade() => t.id(),
            _ => continue,
        };
        let from = board.index(x, y);
        let step = match resolve(board, x, y, mv) {
            Resolution::Stay => continue,
            Resolution::Slide { to } => commit(board, tile, from, to, false),
            Resolution::Merge { to } => commit(board, tile, from, to, true),
        };
        score.credit(step.gained);
        steps.push(step);
    }
    steps
}

fn commit(board: &mut BoardState, tile: TileId, from: usize, to: usize, merge: bool) -> Step {
    let (fx, fy) = board.coords(from);
    let (tx, ty) = board.coords(to);
    let distance = fx.abs_diff(tx).max(fy.abs_diff(ty));

    let mut gained = 0;
    if merge {
        if let Some(target) = board.id_at(to).and_then(|id| board.tile_mut(id)) {
            target.mark_upgrading();
            target.set_depth(DEPTH_ABSORBED);
        }
        if let Some(incoming) = board.tile_mut(tile) {
            incoming.mark_upgrading();
            incoming.set_depth(DEPTH_INCOMING);
            gained = incoming.value();
        }
    }
    let absorbed = board.relocate(from, to);
    debug_assert_eq!(absorbed.is_some(), merge);

    Step {
        tile,
        from,
        to,
        absorbed,
        distance,
        gained,
    }
}

/// Deferred half of a step: double the survivor, unlock it and drop the
/// absorbed tile, which is returned. A slide has nothing to finish.
pub(crate) fn complete(board: &mut BoardState, step: &Step) -> Option<Tile> {
    let absorbed = step.absorbed?;
    if let Some(tile) = board.tile_mut(step.tile) {
        tile.upgrade();
    }
    board.discard(absorbed)
}

/// Sweep and immediately finish every step, as if all animations were instant.
///
/// ```
/// use twenty48_core::engine::{self as GameEngine, BoardState, Move, Score};
/// // 2x2 board, top row [2, 2]
/// let mut board = BoardState::from_values(&[2, 2, 0, 0]).unwrap();
/// let mut score = Score::default();
/// let steps = GameEngine::apply(&mut board, &mut score, Move::Right);
/// assert_eq!(steps.len(), 1);
/// assert_eq!(board.values(), vec![0, 4, 0, 0]);
/// assert_eq!(score.value(), 2);
/// ```
pub fn apply(board: &mut BoardState, score: &mut Score, mv: Move) -> Vec<Step> {
    let steps = sweep(board, score, mv);
    for step in &steps {
        complete(board, step);
    }
    steps
}

/// True if sweeping in `mv` would move or merge anything. The board is untouched.
pub fn can_move(board: &BoardState, mv: Move) -> bool {
    scan_order(board.size(), mv).any(|(x, y)| {
        board.tile_at(x, y).is_some_and(Tile::can_upgrade)
            && resolve(board, x, y, mv) != Resolution::Stay
    })
}

/// True if no direction changes the board.
pub fn is_game_over(board: &BoardState) -> bool {
    Move::ALL.into_iter().all(|mv| !can_move(board, mv))
}
