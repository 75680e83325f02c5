mod actor;
mod config;
mod pipeline;
mod report;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use config::Config;
use report::RunSummary;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play 2048 games headlessly through the grid engine")]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: PathBuf,

    /// Override `num_games` from the configuration
    #[arg(long, value_name = "N")]
    games: Option<u32>,

    /// Override the base seed from the configuration
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Using configuration file: {}", args.config.display());
    let mut cfg = Config::from_toml(&args.config)?;
    if let Some(n) = args.games {
        cfg.num_games = n;
    }
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; letting turns in flight finish");
                cancel.cancel();
            }
        }
    });

    let results = pipeline::run_games(&cfg, cancel).await?;
    let summary = RunSummary::from_results(&results);
    info!(
        "Completed {} game(s) ({} finished): {} steps, best score {}, mean score {:.1}, highest tile {}",
        summary.games,
        summary.finished,
        summary.total_steps,
        summary.best_score,
        RunSummary::mean_score(&results),
        summary.highest_tile
    );
    if let Some(path) = pipeline::write_report(&cfg, &results)? {
        info!("Wrote results to {}", path.display());
    }
    Ok(())
}
