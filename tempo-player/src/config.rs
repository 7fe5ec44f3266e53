//! Settings for the [`Arbiter`](crate::Arbiter).

use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct ArbiterConfig {
    /// How long the strategies may race before the rollout fallback is used.
    pub deadline: Duration,
    /// Rollout picks uniformly among moves scoring within this much of the best.
    pub rollout_delta: f32,
    /// The win-loss explorer only searches positions with at most this many empty cells.
    pub win_loss_empties: u8,
    /// Holds the win-loss explorer back before it starts searching.
    pub win_loss_delay: Option<Duration>,
    /// Seed for the rollout's tie-breaking.
    pub seed: u64,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_millis(1000),
            rollout_delta: 0.01,
            win_loss_empties: 12,
            win_loss_delay: None,
            seed: 0,
        }
    }
}
