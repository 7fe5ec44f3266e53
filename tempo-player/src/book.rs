//! An opening book: known replies to early positions.
//!
//! Positions are looked up in all eight orientations, so a line only needs to
//! be stored once for all of its symmetric variants.

use crate::features::Orientation;
use derive_more::{Display, Error, From};
use log::debug;
use std::collections::HashMap;
use tempo_othello::{Board, Game, GameError, Location, Move, ParseMoveError};

/// Well-known opening lines, as moves from the starting position.
const STANDARD_LINES: [&str; 4] = [
    "F5 D6 C3 D3 C4 F4 F6 F3 E6 E7",
    "F5 D6 C3 D3 C4 F4 C5 B3 C2",
    "F5 F6 E6 F4 E3 C5 C4 E7",
    "F5 F4 E3 F6 D3",
];

#[derive(Debug, Display, Error, From)]
pub enum BookError {
    #[display(fmt = "unreadable move in book line: {}", _0)]
    Parse(ParseMoveError),
    #[display(fmt = "book line is not playable: {}", _0)]
    Illegal(GameError),
}

#[derive(Clone, Debug, Default)]
pub struct OpeningBook {
    replies: HashMap<(u64, u64), Location>,
}

impl OpeningBook {
    /// A small book of standard openings.
    pub fn standard() -> Self {
        match Self::from_lines(&STANDARD_LINES) {
            Ok(book) => book,
            Err(err) => unreachable!("built-in book lines are legal: {}", err),
        }
    }

    /// Build a book from lines of space-separated moves played from the start.
    /// Every position along a line is stored with the move that follows it;
    /// where lines disagree, the first one wins.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, BookError> {
        let mut replies = HashMap::new();

        for line in lines {
            let mut game = Game::default();
            for token in line.as_ref().split_whitespace() {
                let mv: Move = token.parse()?;
                if let Move::Piece(loc) = mv {
                    replies.entry(key(game.board)).or_insert(loc);
                }
                game = game.apply_move(mv)?;
            }
        }

        debug!("Opening book holds {} positions", replies.len());
        Ok(Self { replies })
    }

    /// The number of stored positions, not counting symmetric variants.
    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    /// Whether the book has a reply for the active player of `board`.
    pub fn exists(&self, board: Board) -> bool {
        self.lookup(board).is_some()
    }

    /// The book reply for the active player of `board`, if any.
    pub fn lookup(&self, board: Board) -> Option<Location> {
        Orientation::ALL.iter().find_map(|&orientation| {
            let stored = self.replies.get(&key(orientation.apply_board(board)))?;
            Some(orientation.inverse().apply_location(*stored))
        })
    }
}

fn key(board: Board) -> (u64, u64) {
    (board.active_bitboard.into(), board.opponent_bitboard.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &str) -> Game {
        moves
            .split_whitespace()
            .fold(Game::default(), |game, mv| game.apply_move(mv.parse().unwrap()).unwrap())
    }

    #[test]
    fn standard_book_opens_with_f5() {
        let book = OpeningBook::standard();
        assert!(!book.is_empty());
        assert_eq!(book.lookup(Board::new()), Some("F5".parse().unwrap()));
    }

    #[test]
    fn lookup_follows_lines() {
        let book = OpeningBook::standard();
        let game = play("F5 D6 C3 D3");
        assert_eq!(book.lookup(game.board), Some("C4".parse().unwrap()));
        assert!(book.exists(play("F5 F6 E6").board));
        assert!(!book.exists(play("F5 F6 E6 F4 E3 C5 C4 E7").board));
    }

    #[test]
    fn lookup_is_symmetric() {
        let book = OpeningBook::standard();
        let stored = play("F5");
        let reply: Location = "D6".parse().unwrap();

        for opening in Game::default().get_moves() {
            let game = Game::default().apply_move(Move::Piece(opening)).unwrap();
            let found = book.lookup(game.board).unwrap();
            assert!(game.get_moves().contains(found));

            let orientation = Orientation::ALL
                .iter()
                .find(|o| o.apply_board(stored.board) == game.board)
                .unwrap();
            assert_eq!(found, orientation.apply_location(reply));
        }
    }

    #[test]
    fn bad_lines_are_rejected() {
        assert!(matches!(
            OpeningBook::from_lines(&["F5 Z9"]),
            Err(BookError::Parse(_))
        ));
        assert!(matches!(
            OpeningBook::from_lines(&["F5 A1"]),
            Err(BookError::Illegal(GameError::IllegalMove(_)))
        ));
    }
}
