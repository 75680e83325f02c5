use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use twenty48_core::{Layout, MAX_BOARD_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
pub enum StrategyKind {
    /// Uniform over the directions that change the board.
    Random,
    /// Direction with the largest immediate merge score; ties broken randomly.
    Greedy,
    /// Fixed preference order Down, Left, Right, Up; keeps big tiles in a corner.
    Corner,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Strategy {
    #[serde(rename = "strategy")]
    pub kind: StrategyKind,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            kind: StrategyKind::Random,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    pub num_games: u32,
    pub max_concurrent_games: u32,

    #[serde(default = "defaults::board_size")]
    pub board_size: usize,

    /// Base seed; game `i` uses `seed + i`. Drawn from entropy when omitted.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Stop a game after this many accepted turns even if it is not over.
    #[serde(default)]
    pub max_steps: Option<u64>,

    #[serde(default)]
    pub strategy: Strategy,

    #[serde(default)]
    pub layout: Layout,

    #[serde(default)]
    pub animation: Animation,

    #[serde(default)]
    pub report: Report,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Animation {
    /// Multiplier on every relocation's duration; `0.0` settles turns at once.
    #[serde(default = "defaults::time_scale")]
    pub time_scale: f64,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            time_scale: defaults::time_scale(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Report {
    /// JSON-lines file receiving one record per finished game.
    #[serde(default)]
    pub results_file: Option<PathBuf>,
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if !(2..=MAX_BOARD_SIZE).contains(&self.board_size) {
            bail!(
                "board_size must be between 2 and {MAX_BOARD_SIZE}, got {}",
                self.board_size
            );
        }
        if self.layout.checked_display_size(self.board_size).is_none() {
            bail!(
                "layout (tile_size {}, tile_padding {}) overflows a {}-wide board",
                self.layout.tile_size,
                self.layout.tile_padding,
                self.board_size
            );
        }
        if self.max_concurrent_games == 0 {
            bail!("max_concurrent_games must be at least 1");
        }
        Ok(())
    }
}

mod defaults {
    pub fn board_size() -> usize { 4 }
    pub fn time_scale() -> f64 { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_fills_in_defaults() {
        let cfg = Config::from_toml_str("num_games = 3\nmax_concurrent_games = 2\n").unwrap();
        assert_eq!(cfg.board_size, 4);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.strategy.kind, StrategyKind::Random);
        assert_eq!(cfg.layout, Layout::default());
        assert_eq!(cfg.animation.time_scale, 0.0);
        assert_eq!(cfg.report.results_file, None);
    }

    #[test]
    fn it_reads_nested_sections() {
        let cfg = Config::from_toml_str(
            r#"
            num_games = 10
            max_concurrent_games = 4
            board_size = 5
            seed = 42
            max_steps = 500

            [strategy]
            strategy = "Greedy"

            [layout]
            tween_ms_per_cell = 60

            [animation]
            time_scale = 0.25

            [report]
            results_file = "out/results.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.board_size, 5);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.max_steps, Some(500));
        assert_eq!(cfg.strategy.kind, StrategyKind::Greedy);
        assert_eq!(cfg.layout.tween_ms_per_cell, 60);
        assert_eq!(cfg.layout.tile_size, 75);
        assert_eq!(cfg.animation.time_scale, 0.25);
        assert_eq!(cfg.report.results_file, Some(PathBuf::from("out/results.jsonl")));
    }

    #[test]
    fn it_rejects_degenerate_boards() {
        assert!(Config::from_toml_str("num_games = 1\nmax_concurrent_games = 1\nboard_size = 1\n").is_err());
        assert!(Config::from_toml_str("num_games = 1\nmax_concurrent_games = 0\n").is_err());
        assert!(Config::from_toml_str("num_games = 1\nmax_concurrent_games = 1\nboard_size = 100000\n").is_err());
        assert!(Config::from_toml_str(
            "num_games = 1\nmax_concurrent_games = 1\n[layout]\ntile_size = 4000000000\n"
        )
        .is_err());
        let widest = format!("num_games = 1\nmax_concurrent_games = 1\nboard_size = {MAX_BOARD_SIZE}\n");
        assert_eq!(Config::from_toml_str(&widest).unwrap().board_size, MAX_BOARD_SIZE);
    }
}
