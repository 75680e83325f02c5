//! Boundary between the engine and whatever plays the animations.
//!
//! The engine never touches a rendering type. It asks the host to relocate a
//! tile and gets back a [`Completion`]; the rest of the trait is one-way
//! notifications the host may use to refresh what it shows.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::oneshot;

use crate::engine::{Tile, TileId};
use crate::layout::Point;

/// Fires once a relocation has finished playing. A dropped sender is treated
/// as finished.
pub type Completion = oneshot::Receiver<()>;

pub trait AnimationHost {
    /// Start moving `tile` from its current position to `to` over `duration`.
    fn relocate(&self, tile: &Tile, to: Point, duration: Duration) -> Completion;

    /// A tile was placed on the board.
    fn tile_spawned(&self, _tile: &Tile) {}

    /// A merge finished; `tile` carries its doubled value.
    fn tile_upgraded(&self, _tile: &Tile) {}

    /// A tile was absorbed or discarded by a reset.
    fn tile_removed(&self, _tile: TileId) {}
}

impl<H: AnimationHost + ?Sized> AnimationHost for Arc<H> {
    fn relocate(&self, tile: &Tile, to: Point, duration: Duration) -> Completion {
        (**self).relocate(tile, to, duration)
    }

    fn tile_spawned(&self, tile: &Tile) {
        (**self).tile_spawned(tile)
    }

    fn tile_upgraded(&self, tile: &Tile) {
        (**self).tile_upgraded(tile)
    }

    fn tile_removed(&self, tile: TileId) {
        (**self).tile_removed(tile)
    }
}

/// Completes every relocation on the spot. Useful for headless play and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantHost;

impl AnimationHost for InstantHost {
    fn relocate(&self, _tile: &Tile, _to: Point, _duration: Duration) -> Completion {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(());
        rx
    }
}

/// Plays each relocation as a tokio timer of the requested duration times
/// `time_scale`. Must be driven from inside a tokio runtime.
#[derive(Debug, Clone, Copy)]
pub struct TimerHost {
    time_scale: f64,
}

impl TimerHost {
    /// Non-finite or negative scales collapse to `0.0`.
    pub fn new(time_scale: f64) -> Self {
        let time_scale = if time_scale.is_finite() && time_scale > 0.0 { time_scale } else { 0.0 };
        Self { time_scale }
    }

    #[inline]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
}

impl Default for TimerHost {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl AnimationHost for TimerHost {
    fn relocate(&self, tile: &Tile, to: Point, duration: Duration) -> Completion {
        let (tx, rx) = oneshot::channel();
        let scaled = duration.mul_f64(self.time_scale);
        debug!(
            "relocating tile {} from {:?} to {:?} over {:?}",
            tile.id(),
            tile.position(),
            to,
            scaled
        );
        tokio::spawn(async move {
            tokio::time::sleep(scaled).await;
            let _ = tx.send(());
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BoardState;

    fn some_tile() -> Tile {
        let mut board = BoardState::new(2).unwrap();
        let id = board.place(0, 2, Point::default()).unwrap();
        board.tile(id).unwrap().clone()
    }

    #[tokio::test]
    async fn instant_host_is_already_complete() {
        let mut done = InstantHost.relocate(&some_tile(), Point::new(1, 1), Duration::from_secs(9));
        assert_eq!(done.try_recv(), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_host_waits_for_the_scaled_duration() {
        let host = TimerHost::new(0.5);
        let mut done = host.relocate(&some_tile(), Point::new(1, 1), Duration::from_millis(200));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(done.try_recv().is_err());
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(done.try_recv(), Ok(()));
    }

    #[test]
    fn it_clamps_bad_time_scales() {
        assert_eq!(TimerHost::new(f64::NAN).time_scale(), 0.0);
        assert_eq!(TimerHost::new(-2.0).time_scale(), 0.0);
        assert_eq!(TimerHost::new(2.0).time_scale(), 2.0);
    }
}
