//! The strategies raced by the [`Arbiter`](crate::Arbiter), and the state they share during a race.

use crate::book::OpeningBook;
use crate::endgame;
use crate::rollout::RolloutPolicy;
use derive_more::Display;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tempo_othello::{Game, Location};

/// How often a sleeping strategy wakes up to check for cancellation.
const SLEEP_SLICE: Duration = Duration::from_millis(5);

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Book,
    Rollout,
    WinLoss,
}

/// Why a strategy declined to pick a move.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum AbstainReason {
    #[display(fmt = "position is not in the book")]
    NotInBook,
    #[display(fmt = "{} empties is too many to search", _0)]
    TooManyEmpties(u8),
    #[display(fmt = "no legal moves")]
    NoMoves,
    #[display(fmt = "cancelled")]
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyOutcome {
    Decided(Location),
    Abstained(AbstainReason),
}

/// State shared by the strategies in one race: a cancellation flag, and the
/// rollout's most recent candidate move.
#[derive(Debug, Default)]
pub struct RaceControl {
    cancelled: AtomicBool,
    last_candidate: Mutex<Option<Location>>,
}

impl RaceControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every strategy in the race to stop.
    pub fn cancel(&self) {
        // Taken under the lock so no candidate is recorded after this returns.
        let _guard = self.last_candidate.lock().unwrap_or_else(PoisonError::into_inner);
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// The raw flag, for searches that poll it.
    pub fn cancel_flag(&self) -> &AtomicBool {
        &self.cancelled
    }

    /// Record a fallback move. Returns false, recording nothing, once the race is cancelled.
    pub fn record_candidate(&self, loc: Location) -> bool {
        let mut candidate = self.last_candidate.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_cancelled() {
            return false;
        }
        *candidate = Some(loc);
        true
    }

    pub fn last_candidate(&self) -> Option<Location> {
        *self.last_candidate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `duration`, waking early if cancelled. Returns false if cancelled.
    pub fn sleep(&self, duration: Duration) -> bool {
        let start = Instant::now();
        while !self.is_cancelled() {
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return true;
            }
            thread::sleep(SLEEP_SLICE.min(duration - elapsed));
        }
        false
    }
}

/// Exhaustive search for positions near the end of the game.
#[derive(Clone, Debug)]
pub struct WinLossExplorer {
    max_empties: u8,
    delay: Option<Duration>,
}

impl WinLossExplorer {
    pub fn new(max_empties: u8, delay: Option<Duration>) -> Self {
        Self { max_empties, delay }
    }

    fn explore(&self, game: &Game, control: &RaceControl) -> StrategyOutcome {
        let empties = game.count_empties();
        if empties > self.max_empties {
            return StrategyOutcome::Abstained(AbstainReason::TooManyEmpties(empties));
        }

        if let Some(delay) = self.delay {
            if !control.sleep(delay) {
                return StrategyOutcome::Abstained(AbstainReason::Cancelled);
            }
        }

        match endgame::best_move(game.board, control.cancel_flag()) {
            Some((loc, score)) => {
                debug!("Solved {} empties: {} scores {}", empties, loc, score);
                StrategyOutcome::Decided(loc)
            }
            None if control.is_cancelled() => StrategyOutcome::Abstained(AbstainReason::Cancelled),
            None => StrategyOutcome::Abstained(AbstainReason::NoMoves),
        }
    }
}

/// One of the ways of choosing a move.
pub enum Strategy {
    Book(OpeningBook),
    Rollout(RolloutPolicy),
    WinLoss(WinLossExplorer),
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Book(_) => StrategyKind::Book,
            Strategy::Rollout(_) => StrategyKind::Rollout,
            Strategy::WinLoss(_) => StrategyKind::WinLoss,
        }
    }

    /// Prepare for a race before any strategy starts. The rollout seeds the
    /// fallback with the first legal move, so a fallback always exists.
    pub fn prime(&self, game: &Game, control: &RaceControl) {
        if let Strategy::Rollout(_) = self {
            if let Some(first) = game.get_moves().first() {
                control.record_candidate(first);
            }
        }
    }

    /// Choose a move for the active player of `game`, or abstain.
    /// Must not block on anything but its own computation.
    pub fn evaluate(&self, game: &Game, control: &RaceControl) -> StrategyOutcome {
        match self {
            Strategy::Book(book) => match book.lookup(game.board) {
                Some(loc) if game.get_moves().contains(loc) => {
                    debug!("Book move {}", loc);
                    StrategyOutcome::Decided(loc)
                }
                _ => StrategyOutcome::Abstained(AbstainReason::NotInBook),
            },
            Strategy::Rollout(policy) => match policy.rollout(game, control) {
                Some(loc) => StrategyOutcome::Decided(loc),
                None if control.is_cancelled() => StrategyOutcome::Abstained(AbstainReason::Cancelled),
                None => StrategyOutcome::Abstained(AbstainReason::NoMoves),
            },
            Strategy::WinLoss(explorer) => explorer.explore(game, control),
        }
    }
}
