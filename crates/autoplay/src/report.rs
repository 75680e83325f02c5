use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::actor::GameResult;

/// Aggregate over every game of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    pub games: usize,
    pub finished: usize,
    pub total_steps: u64,
    pub best_score: u64,
    pub highest_tile: u32,
}

impl RunSummary {
    pub fn from_results(results: &[GameResult]) -> Self {
        results.iter().fold(Self::default(), |acc, r| Self {
            games: acc.games + 1,
            finished: acc.finished + usize::from(r.finished),
            total_steps: acc.total_steps + r.steps,
            best_score: acc.best_score.max(r.score),
            highest_tile: acc.highest_tile.max(r.highest_tile),
        })
    }

    pub fn mean_score(results: &[GameResult]) -> f64 {
        if results.is_empty() {
            return 0.0;
        }
        results.iter().map(|r| r.score as f64).sum::<f64>() / results.len() as f64
    }
}

/// Writes one JSON object per game, one per line.
pub struct ResultsWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl ResultsWriter {
    /// Create (or truncate) `path`, creating parent directories as needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self {
            path,
            out: BufWriter::new(file),
        })
    }

    pub fn write(&mut self, result: &GameResult) -> Result<()> {
        serde_json::to_writer(&mut self.out, result)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<PathBuf> {
        self.out
            .flush()
            .with_context(|| format!("failed to flush {}", self.path.display()))?;
        Ok(self.path)
    }
}
