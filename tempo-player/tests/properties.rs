//! Checks the encoder and strategies over positions from random games.

use indicatif::ProgressIterator;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;
use tempo_othello::test_utils::random_game;
use tempo_othello::Game;
use tempo_player::features::FEATURE_LEN;
use tempo_player::{
    encode_move, LinearModel, OpeningBook, Orientation, RaceControl, RolloutPolicy,
    ScoringFunction,
};

const NUM_GAMES: u64 = 50;

fn positions() -> impl Iterator<Item = Game> {
    (0..NUM_GAMES)
        .progress_count(NUM_GAMES)
        .flat_map(|seed| random_game(&mut SmallRng::seed_from_u64(seed)))
}

#[test]
fn encoding_inverts_to_the_position() {
    for game in positions() {
        for mv in game.get_moves() {
            let features = encode_move(&game, mv);
            let undo = Orientation::canonical(game.board, mv).inverse();

            assert_eq!(undo.apply(features.plane(0)), game.board.active_bitboard);
            assert_eq!(undo.apply(features.plane(1)), game.board.opponent_bitboard);
            assert_eq!(undo.apply(features.plane(2)), game.board.empty_mask());
            assert_eq!(undo.apply(features.plane(3)), mv.bitboard());
            assert_eq!(
                undo.apply(features.plane(4)),
                mv.bitboard() | game.board.flips(mv)
            );
            if !game.parity.early_turn {
                assert_eq!(
                    undo.apply(features.plane(5) | features.plane(6)),
                    game.board.empty_mask()
                );
            }
        }
    }
}

#[test]
fn heuristic_scores_are_finite() {
    let model = LinearModel::heuristic();
    for game in positions() {
        for mv in game.get_moves() {
            let features = encode_move(&game, mv);
            assert_eq!(features.to_vec().len(), FEATURE_LEN);
            assert!(model.score(&features).is_finite());
        }
    }
}

#[test]
fn rollout_picks_legal_moves() {
    let policy = RolloutPolicy::new(Arc::new(LinearModel::heuristic()), 0.01, 11);
    for game in positions().step_by(5) {
        let moves = game.get_moves();
        let candidates = policy.candidates(&game);
        assert_eq!(candidates.is_empty(), moves.is_empty());
        assert!(candidates.iter().all(|&mv| moves.contains(mv)));

        let control = RaceControl::new();
        match policy.rollout(&game, &control) {
            Some(choice) => {
                assert!(candidates.contains(&choice));
                assert_eq!(control.last_candidate(), Some(choice));
            }
            None => assert!(moves.is_empty()),
        }
    }
}

#[test]
fn book_replies_are_legal() {
    let book = OpeningBook::standard();
    for game in positions() {
        if let Some(reply) = book.lookup(game.board) {
            assert!(game.get_moves().contains(reply), "{} in\n{}", reply, game);
        }
    }
}
