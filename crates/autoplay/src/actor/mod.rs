use crate::config;
use log::{debug, info};
use rand::SeedableRng;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use twenty48_core::{AnimationHost, Grid, GridError, Session};

pub mod strategies;

/// Per-game actor that drives a single board to completion through the same
/// turn gate an input layer would use.
pub struct GameActor<H> {
    pub game_id: u32,
    pub seed: u64,
    pub session: Session<H>,
    pub strategy: config::StrategyKind,
    pub max_steps: Option<u64>,
    pub cancel: CancellationToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub game_id: u32,
    pub seed: u64,
    pub steps: u64,
    pub score: u64,
    pub highest_tile: u32,
    /// False when the game stopped on the step cap or on cancellation.
    pub finished: bool,
}

impl<H: AnimationHost> GameActor<H> {
    /// Build the grid for one game and put the first tile down.
    pub fn new(
        game_id: u32,
        seed: u64,
        cfg: &config::Config,
        host: H,
        cancel: CancellationToken,
    ) -> Result<Self, GridError> {
        let mut grid = Grid::seeded(cfg.board_size, cfg.layout.clone(), host, seed)?;
        grid.reset()?;
        Ok(Self {
            game_id,
            seed,
            session: Session::new(grid),
            strategy: cfg.strategy.kind,
            max_steps: cfg.max_steps,
            cancel,
        })
    }

    /// Run the actor loop to completion and return the result.
    ///
    /// Cancellation is only observed between turns; a turn that has started
    /// always plays out.
    pub async fn run(self) -> Result<GameResult, GridError> {
        let mut steps: u64 = 0;
        let mut rng = rand::rngs::StdRng::seed_from_u64(self.seed.rotate_left(32));

        let finished = loop {
            if self.cancel.is_cancelled() {
                break false;
            }
            if self.max_steps.is_some_and(|max| steps >= max) {
                break false;
            }
            let mv = self
                .session
                .inspect(|g| strategies::select_move(self.strategy, g.board(), &mut rng))
                .await;
            let Some(mv) = mv else {
                break true;
            };
            let outcome = self.session.play(mv).await?;
            if outcome.moved {
                steps += 1;
            } else {
                debug!("game {}: {mv:?} was chosen but moved nothing", self.game_id);
            }
        };

        let (score, highest_tile) = self
            .session
            .inspect(|g| (g.score(), g.board().highest_tile()))
            .await;
        info!(
            "game {} done: steps={} score={} highest={} finished={}",
            self.game_id, steps, score, highest_tile, finished
        );
        Ok(GameResult {
            game_id: self.game_id,
            seed: self.seed,
            steps,
            score,
            highest_tile,
            finished,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twenty48_core::InstantHost;

    fn cfg(extra: &str) -> config::Config {
        config::Config::from_toml_str(&format!(
            "num_games = 1\nmax_concurrent_games = 1\nboard_size = 3\n{extra}"
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn it_plays_a_small_board_to_the_end() {
        let actor = GameActor::new(7, 123, &cfg(""), InstantHost, CancellationToken::new()).unwrap();
        let session = actor.session.clone();
        let res = actor.run().await.unwrap();
        assert!(res.finished);
        assert_eq!((res.game_id, res.seed), (7, 123));
        assert!(res.steps > 0);
        assert!(res.highest_tile >= 4);
        assert!(session.is_game_over().await);
        assert_eq!(session.score().await, res.score);
    }

    #[tokio::test]
    async fn it_honours_the_step_cap() {
        let actor = GameActor::new(1, 9, &cfg("max_steps = 3"), InstantHost, CancellationToken::new()).unwrap();
        let res = actor.run().await.unwrap();
        assert_eq!(res.steps, 3);
        assert!(!res.finished);
    }

    #[tokio::test]
    async fn it_stops_before_playing_when_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let actor = GameActor::new(2, 5, &cfg(""), InstantHost, cancel).unwrap();
        let res = actor.run().await.unwrap();
        assert_eq!(res.steps, 0);
        assert!(!res.finished);
        assert_eq!(res.highest_tile, 2);
    }

    #[tokio::test]
    async fn same_seed_replays_the_same_game() {
        let a = GameActor::new(0, 77, &cfg(""), InstantHost, CancellationToken::new()).unwrap();
        let b = GameActor::new(0, 77, &cfg(""), InstantHost, CancellationToken::new()).unwrap();
        assert_eq!(a.run().await.unwrap(), b.run().await.unwrap());
    }
}
