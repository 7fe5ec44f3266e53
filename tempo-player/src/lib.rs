//! `tempo-player` picks Othello moves by racing several strategies against a deadline.
//!
//!  - [`features`] encodes a position and candidate move for the scoring function.
//!  - [`scoring`] defines the scoring function, and a linear model implementing it.
//!  - [`strategy`] holds the strategies: an opening [`book`], a learned-value [`rollout`],
//!    and an exhaustive [`endgame`] search.
//!  - [`Arbiter`] runs the strategies in parallel and commits to the first decision,
//!    falling back to the rollout's best candidate if time runs out.

pub mod arbiter;
pub mod book;
pub mod config;
pub mod endgame;
pub mod features;
pub mod rollout;
pub mod scoring;
pub mod strategy;

pub use arbiter::{Arbiter, ArbiterError, Decision, Resolution};
pub use book::OpeningBook;
pub use config::ArbiterConfig;
pub use features::{encode, encode_move, FeatureBuffer, Orientation};
pub use rollout::RolloutPolicy;
pub use scoring::{LinearModel, ScoringError, ScoringFunction};
pub use strategy::{
    AbstainReason, RaceControl, Strategy, StrategyKind, StrategyOutcome, WinLossExplorer,
};
