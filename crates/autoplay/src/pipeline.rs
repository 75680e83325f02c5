use crate::actor::{GameActor, GameResult};
use crate::config;
use crate::report::ResultsWriter;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use twenty48_core::TimerHost;

/// Seed of game `game_id` within a run seeded with `base`.
pub fn game_seed(base: u64, game_id: u32) -> u64 {
    base.wrapping_add(u64::from(game_id))
}

/// Play `cfg.num_games` games, at most `cfg.max_concurrent_games` at a time.
///
/// Games that have not started when `cancel` fires are skipped; games in
/// progress stop after their current turn. Results come back ordered by id.
pub async fn run_games(cfg: &config::Config, cancel: CancellationToken) -> Result<Vec<GameResult>> {
    let base_seed = cfg.seed.unwrap_or_else(rand::random);
    info!(
        "starting {} game(s) on a {}x{} board, {} at a time, strategy {:?}, base seed {}",
        cfg.num_games, cfg.board_size, cfg.board_size, cfg.max_concurrent_games, cfg.strategy.kind, base_seed
    );

    let permits = Arc::new(Semaphore::new(cfg.max_concurrent_games as usize));
    let host = TimerHost::new(cfg.animation.time_scale);
    let mut games = JoinSet::new();

    for game_id in 0..cfg.num_games {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            permit = permits.clone().acquire_owned() => permit.context("game semaphore closed")?,
        };
        let actor = GameActor::new(game_id, game_seed(base_seed, game_id), cfg, host, cancel.clone())
            .with_context(|| format!("failed to set up game {game_id}"))?;
        games.spawn(async move {
            let _permit = permit;
            actor.run().await
        });
    }

    let mut results = Vec::with_capacity(cfg.num_games as usize);
    while let Some(joined) = games.join_next().await {
        let result = joined.context("game task panicked")??;
        results.push(result);
    }
    if cancel.is_cancelled() {
        warn!("run interrupted after {} of {} game(s)", results.len(), cfg.num_games);
    }
    results.sort_by_key(|r| r.game_id);
    Ok(results)
}

/// Write the per-game records if a results file is configured.
pub fn write_report(cfg: &config::Config, results: &[GameResult]) -> Result<Option<PathBuf>> {
    let Some(path) = &cfg.report.results_file else {
        return Ok(None);
    };
    let mut writer = ResultsWriter::create(path)?;
    for result in results {
        writer.write(result)?;
    }
    writer.finish().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cfg(extra: &str) -> config::Config {
        config::Config::from_toml_str(&format!(
            "num_games = 4\nmax_concurrent_games = 2\nboard_size = 3\nseed = 11\n{extra}"
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn plays_every_game_in_order() {
        let results = run_games(&cfg(""), CancellationToken::new()).await.unwrap();
        let ids: Vec<u32> = results.iter().map(|r| r.game_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(results.iter().all(|r| r.finished));
        assert_eq!(results[2].seed, game_seed(11, 2));
    }

    #[tokio::test]
    async fn runs_are_reproducible_from_the_seed() {
        let c = cfg("[strategy]\nstrategy = \"Corner\"\n");
        let a = run_games(&c, CancellationToken::new()).await.unwrap();
        let b = run_games(&c, CancellationToken::new()).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn cancelled_run_plays_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let results = run_games(&cfg(""), cancel).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn writes_the_configured_report() {
        let td = tempdir().unwrap();
        let path = td.path().join("results.jsonl");
        let mut c = cfg("max_steps = 5");
        c.report.results_file = Some(path.clone());
        let results = run_games(&c, CancellationToken::new()).await.unwrap();
        assert!(results.iter().all(|r| r.steps == 5 && !r.finished));
        assert_eq!(write_report(&c, &results).unwrap(), Some(path.clone()));
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);

        let mut none = cfg("");
        none.report.results_file = None;
        assert_eq!(write_report(&none, &results).unwrap(), None);
    }
}
