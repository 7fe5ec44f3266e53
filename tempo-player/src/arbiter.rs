//! Races the strategies against a shared deadline.
//!
//! Every strategy is handed the same snapshot of the game on its own worker
//! thread. The first one to decide wins, and the rest are cancelled. If the
//! deadline passes first, the rollout's most recent candidate is played instead.

use crate::book::OpeningBook;
use crate::config::ArbiterConfig;
use crate::rollout::RolloutPolicy;
use crate::scoring::ScoringFunction;
use crate::strategy::{RaceControl, Strategy, StrategyKind, StrategyOutcome, WinLossExplorer};
use async_std::{channel, future, task};
use derive_more::{Display, Error, From};
use log::{debug, warn};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::sync::Arc;
use std::time::Instant;
use tempo_othello::{Game, Location, Move};

#[derive(Debug, Display, Error, From)]
pub enum ArbiterError {
    #[display(fmt = "could not start strategy workers: {}", _0)]
    Pool(ThreadPoolBuildError),
    #[display(fmt = "a rollout strategy is required as the fallback")]
    MissingRollout,
}

/// How a race ended.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Resolution {
    #[display(fmt = "decided by {}", _0)]
    Decided(StrategyKind),
    #[display(fmt = "timed out")]
    TimedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub location: Location,
    pub resolution: Resolution,
    /// The rollout's last recorded candidate when the race ended.
    pub rollout_candidate: Option<Location>,
}

pub struct Arbiter {
    strategies: Arc<Vec<Strategy>>,
    pool: ThreadPool,
    config: ArbiterConfig,
}

impl Arbiter {
    /// Race `strategies`, one worker thread each. One of them must be a rollout.
    pub fn new(config: ArbiterConfig, strategies: Vec<Strategy>) -> Result<Self, ArbiterError> {
        if !strategies.iter().any(|s| s.kind() == StrategyKind::Rollout) {
            return Err(ArbiterError::MissingRollout);
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(strategies.len())
            .thread_name(|i| format!("strategy-{}", i))
            .build()?;

        Ok(Self {
            strategies: Arc::new(strategies),
            pool,
            config,
        })
    }

    /// The standard line-up: the built-in opening book, a rollout over `scorer`,
    /// and the win-loss explorer.
    pub fn with_scorer(
        config: ArbiterConfig,
        scorer: Arc<dyn ScoringFunction>,
    ) -> Result<Self, ArbiterError> {
        let strategies = vec![
            Strategy::Book(OpeningBook::standard()),
            Strategy::Rollout(RolloutPolicy::new(scorer, config.rollout_delta, config.seed)),
            Strategy::WinLoss(WinLossExplorer::new(
                config.win_loss_empties,
                config.win_loss_delay,
            )),
        ];
        Self::new(config, strategies)
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Pick a move for the active player. Returns `None` if they have to pass.
    ///
    /// # Panics
    /// If every strategy abstains, or the deadline passes with no rollout candidate.
    pub fn decide(&self, game: &Game) -> Option<Decision> {
        if game.get_moves().is_empty() {
            return None;
        }

        let start = Instant::now();
        let control = Arc::new(RaceControl::new());
        for strategy in self.strategies.iter() {
            strategy.prime(game, &control);
        }

        let (sender, receiver) = channel::bounded(self.strategies.len());
        for index in 0..self.strategies.len() {
            let strategies = Arc::clone(&self.strategies);
            let control = Arc::clone(&control);
            let sender = sender.clone();
            let snapshot = *game;

            self.pool.spawn(move || {
                let strategy = &strategies[index];
                let outcome = strategy.evaluate(&snapshot, &control);
                // The receiver is gone once the race is over.
                let _ = sender.try_send((strategy.kind(), outcome));
            });
        }
        drop(sender);

        let race = async {
            while let Ok((kind, outcome)) = receiver.recv().await {
                match outcome {
                    StrategyOutcome::Decided(loc) => return Some((kind, loc)),
                    StrategyOutcome::Abstained(reason) => debug!("{} abstained: {}", kind, reason),
                }
            }
            None
        };
        let result = task::block_on(future::timeout(self.config.deadline, race));

        control.cancel();
        let rollout_candidate = control.last_candidate();

        let (location, resolution) = match result {
            Ok(Some((kind, loc))) => (loc, Resolution::Decided(kind)),
            Ok(None) => panic!("every strategy abstained on a position with legal moves"),
            Err(_) => {
                warn!(
                    "No strategy decided within {:?}; falling back to the rollout candidate",
                    self.config.deadline
                );
                match rollout_candidate {
                    Some(loc) => (loc, Resolution::TimedOut),
                    None => panic!("race timed out without a rollout candidate"),
                }
            }
        };

        debug!(
            "Chose {} ({}) in {:?}",
            location,
            resolution,
            start.elapsed()
        );
        Some(Decision {
            location,
            resolution,
            rollout_candidate,
        })
    }

    /// The move to play: the decided location, or a pass.
    pub fn play(&self, game: &Game) -> Move {
        match self.decide(game) {
            Some(decision) => Move::Piece(decision.location),
            None => Move::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinearModel;
    use tempo_othello::bitboard::{Bitboard, WHITE_START};
    use tempo_othello::{Board, Player};

    #[test]
    fn rollout_is_required() {
        let strategies = vec![Strategy::Book(OpeningBook::standard())];
        assert!(matches!(
            Arbiter::new(ArbiterConfig::default(), strategies),
            Err(ArbiterError::MissingRollout)
        ));
    }

    #[test]
    fn decides_the_opening() {
        let arbiter =
            Arbiter::with_scorer(ArbiterConfig::default(), Arc::new(LinearModel::heuristic()))
                .unwrap();
        let decision = arbiter.decide(&Game::default()).unwrap();
        assert!(Game::default().get_moves().contains(decision.location));
        assert!(matches!(decision.resolution, Resolution::Decided(_)));
    }

    #[test]
    fn passes_without_moves() {
        let arbiter =
            Arbiter::with_scorer(ArbiterConfig::default(), Arc::new(LinearModel::heuristic()))
                .unwrap();
        let board = Board::from_bitboards(WHITE_START, Bitboard::EMPTY);
        let game = Game::from_board(board, Player::Black);
        assert_eq!(arbiter.decide(&game), None);
        assert_eq!(arbiter.play(&game), Move::Pass);
    }
}
