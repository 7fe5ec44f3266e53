//! The rollout policy: score every legal move once and pick among the best.

use crate::features::encode_move;
use crate::scoring::ScoringFunction;
use crate::strategy::RaceControl;
use itertools::Itertools;
use log::trace;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};
use tempo_othello::{Game, Location};

pub struct RolloutPolicy {
    scorer: Arc<dyn ScoringFunction>,
    delta: f32,
    rng: Mutex<SmallRng>,
}

impl RolloutPolicy {
    pub fn new(scorer: Arc<dyn ScoringFunction>, delta: f32, seed: u64) -> Self {
        Self {
            scorer,
            delta,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Score each legal move of `game` for its active player.
    pub fn score_moves(&self, game: &Game) -> Vec<(Location, f32)> {
        game.get_moves()
            .map(|mv| (mv, self.scorer.score(&encode_move(game, mv))))
            .collect()
    }

    /// The legal moves scoring within the tie-break delta of the best one.
    pub fn candidates(&self, game: &Game) -> Vec<Location> {
        near_best(&self.score_moves(game), self.delta)
    }

    /// Pick a move, recording the best move found so far with `control` as
    /// each move is scored. Returns `None` if there are no moves or the race
    /// is cancelled first.
    pub fn rollout(&self, game: &Game, control: &RaceControl) -> Option<Location> {
        let mut scores = Vec::with_capacity(game.get_moves().len());
        let mut best: Option<(Location, f32)> = None;

        for mv in game.get_moves() {
            if control.is_cancelled() {
                return None;
            }

            let score = self.scorer.score(&encode_move(game, mv));
            trace!("Rollout scored {} at {:.4}", mv, score);
            scores.push((mv, score));

            if best.map_or(true, |(_, top)| score > top) {
                best = Some((mv, score));
                control.record_candidate(mv);
            }
        }

        let choice = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            *near_best(&scores, self.delta).choose(&mut *rng)?
        };

        if control.record_candidate(choice) {
            Some(choice)
        } else {
            None
        }
    }
}

/// Moves whose score is within `delta` of the maximum, in their original order.
fn near_best(scores: &[(Location, f32)], delta: f32) -> Vec<Location> {
    let top = scores
        .iter()
        .map(|&(_, score)| score)
        .fold(f32::NEG_INFINITY, f32::max);

    scores
        .iter()
        .filter(|&&(_, score)| score + delta >= top)
        .map(|&(mv, _)| mv)
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureBuffer;
    use crate::LinearModel;

    #[test]
    fn near_best_keeps_ties() {
        let a = Location::from_index(0);
        let b = Location::from_index(1);
        let c = Location::from_index(2);
        let scores = [(a, 1.0), (b, 0.995), (c, 0.5)];
        assert_eq!(near_best(&scores, 0.01), vec![a, b]);
        assert_eq!(near_best(&scores, 0.0), vec![a]);
        assert!(near_best(&[], 0.01).is_empty());
    }

    #[test]
    fn rollout_picks_a_candidate() {
        let policy = RolloutPolicy::new(Arc::new(LinearModel::heuristic()), 0.01, 7);
        let game = Game::default();
        let candidates = policy.candidates(&game);

        for _ in 0..10 {
            let control = RaceControl::new();
            let choice = policy.rollout(&game, &control).unwrap();
            assert!(candidates.contains(&choice));
            assert_eq!(control.last_candidate(), Some(choice));
        }
    }

    #[test]
    fn uniform_scores_tie_everywhere() {
        let flat = |_: &FeatureBuffer| 0.0_f32;
        let policy = RolloutPolicy::new(Arc::new(flat), 0.01, 1);
        let game = Game::default();
        assert_eq!(policy.candidates(&game).len(), game.get_moves().len());
    }

    #[test]
    fn cancelled_rollout_records_nothing() {
        let policy = RolloutPolicy::new(Arc::new(LinearModel::heuristic()), 0.01, 7);
        let control = RaceControl::new();
        control.cancel();
        assert_eq!(policy.rollout(&Game::default(), &control), None);
        assert_eq!(control.last_candidate(), None);
    }
}
