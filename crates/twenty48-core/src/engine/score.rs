use serde::{Deserialize, Serialize};

/// Running total of merged values for one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Score(u64);

impl Score {
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Credit one merge. `merged` is the incoming tile's value before doubling.
    #[inline]
    pub(crate) fn credit(&mut self, merged: u32) {
        self.0 = self.0.saturating_add(u64::from(merged));
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        self.0 = 0;
    }
}

impl From<Score> for u64 {
    fn from(s: Score) -> Self {
        s.value()
    }
}
