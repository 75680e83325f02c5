//! Cell-to-pixel geometry and relocation timing. Pure functions of the
//! configured sizes; no board state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Display coordinate of a tile's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Edge length of one tile, in pixels.
    #[serde(default = "defaults::tile_size")]
    pub tile_size: u32,
    /// Gap between tiles and around the board edge.
    #[serde(default = "defaults::tile_padding")]
    pub tile_padding: u32,
    /// Relocation time per cell travelled.
    #[serde(default = "defaults::tween_ms_per_cell")]
    pub tween_ms_per_cell: u64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            tile_size: defaults::tile_size(),
            tile_padding: defaults::tile_padding(),
            tween_ms_per_cell: defaults::tween_ms_per_cell(),
        }
    }
}

impl Layout {
    /// Offset of column/row `p` from the board's edge.
    ///
    /// ```
    /// use twenty48_core::Layout;
    /// let layout = Layout::default();
    /// assert_eq!(layout.cell_position(0), 5);
    /// assert_eq!(layout.cell_position(3), 245);
    /// ```
    ///
    /// Saturates at `u32::MAX`; [`Layout::checked_display_size`] tells whether
    /// a board fits without saturating.
    #[inline]
    pub fn cell_position(&self, p: usize) -> u32 {
        let p = u32::try_from(p).unwrap_or(u32::MAX);
        self.tile_padding
            .saturating_add(p.saturating_mul(self.tile_size.saturating_add(self.tile_padding)))
    }

    /// Top-left corner of the cell at linear `index` on a `size`-wide board.
    pub fn cell_origin(&self, index: usize, size: usize) -> Point {
        Point::new(self.cell_position(index % size), self.cell_position(index / size))
    }

    /// Edge length of the whole board, padding included. Saturates like
    /// [`Layout::cell_position`].
    #[inline]
    pub fn display_size(&self, size: usize) -> u32 {
        self.checked_display_size(size).unwrap_or(u32::MAX)
    }

    /// Edge length of a `size`-wide board, or `None` if it overflows `u32`.
    pub fn checked_display_size(&self, size: usize) -> Option<u32> {
        let size = u32::try_from(size).ok()?;
        self.tile_size
            .checked_add(self.tile_padding)?
            .checked_mul(size)?
            .checked_add(self.tile_padding)
    }

    /// How long a relocation over `distance` cells (Chebyshev) plays.
    #[inline]
    pub fn tween_duration(&self, distance: usize) -> Duration {
        Duration::from_millis(self.tween_ms_per_cell.saturating_mul(distance as u64))
    }
}

mod defaults {
    pub fn tile_size() -> u32 { 75 }
    pub fn tile_padding() -> u32 { 5 }
    pub fn tween_ms_per_cell() -> u64 { 100 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_sizes_a_four_by_four_board() {
        let layout = Layout::default();
        assert_eq!(layout.display_size(4), 325);
        assert_eq!(layout.cell_origin(6, 4), Point::new(165, 85));
    }

    #[test]
    fn it_refuses_boards_that_overflow() {
        let layout = Layout {
            tile_size: u32::MAX / 4,
            ..Layout::default()
        };
        assert_eq!(layout.checked_display_size(4), None);
        assert_eq!(layout.display_size(4), u32::MAX);
        assert_eq!(layout.cell_position(usize::MAX), u32::MAX);
        assert_eq!(Layout::default().checked_display_size(4), Some(325));
        assert_eq!(Layout::default().checked_display_size(usize::MAX), None);
    }

    #[test]
    fn it_scales_tweens_with_distance() {
        let layout = Layout {
            tween_ms_per_cell: 40,
            ..Layout::default()
        };
        assert_eq!(layout.tween_duration(0), Duration::ZERO);
        assert_eq!(layout.tween_duration(3), Duration::from_millis(120));
    }
}
