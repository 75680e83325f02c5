//! Grid movement and merge engine for 2048-style tile-sliding games.
//!
//! A turn has two halves. The synchronous half ([`engine::sweep`]) decides
//! every tile's destination, commits occupancy, merge locks and score in one
//! go. The asynchronous half ([`Grid::shift`]) hands each moved tile to an
//! [`AnimationHost`], waits for all of them and settles merges as their
//! relocations finish. [`Session`] adds the turn gate and the post-turn spawn.
//!
//! ```
//! use twenty48_core::{Grid, InstantHost, Layout, Move, Session};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let grid = Grid::from_values(
//!     &[2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
//!     Layout::default(),
//!     InstantHost,
//!     rand::SeedableRng::seed_from_u64(1),
//! )
//! .unwrap();
//! let session = Session::new(grid);
//! let turn = session.play(Move::Right).await.unwrap();
//! assert!(turn.moved);
//! assert_eq!(turn.score, 2);
//! # });
//! ```

pub mod engine;
pub mod error;
pub mod grid;
pub mod host;
pub mod layout;
pub mod session;

pub use engine::{BoardState, Move, Score, Tile, TileId, MAX_BOARD_SIZE, MAX_TILE_VALUE, MIN_TILE_VALUE};
pub use error::GridError;
pub use grid::Grid;
pub use host::{AnimationHost, Completion, InstantHost, TimerHost};
pub use layout::{Layout, Point};
pub use session::{Session, TurnOutcome};
