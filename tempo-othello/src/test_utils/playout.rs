use crate::{Game, Move};
use rand::seq::IteratorRandom;
use rand::Rng;

/// Play a game with uniformly random moves, returning every position along the way,
/// from the starting position to the finished one.
pub fn random_game<R: Rng>(rng: &mut R) -> Vec<Game> {
    let mut game = Game::default();
    let mut history = vec![game];

    while !game.is_finished() {
        let mv = game.get_moves().choose(rng).map_or(Move::Pass, Move::Piece);
        game = match game.apply_move(mv) {
            Ok(next) => next,
            Err(err) => unreachable!("random mover chose an illegal move: {}", err),
        };
        history.push(game);
    }

    history
}
