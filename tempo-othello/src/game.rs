//! Implements game-level Othello logic.
//!
//! For correctness, this higher-level interface is preferred, but for
//! performance you may use [`Board`] for raw bitboard access.

use crate::bitboard::Bitboard;
use crate::parity::ParityState;
use crate::{utils, Board, Location, LocationList, ParseLocationError};
use derive_more::{Display, Error, From};
use std::fmt;
use std::str::FromStr;

/// One of the two players in a game.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Default for Player {
    /// Gets the starting player (black).
    fn default() -> Self {
        Self::Black
    }
}

impl std::ops::Not for Player {
    type Output = Self;

    /// Gets the other player.
    fn not(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

#[derive(Debug, Display, Error, PartialEq)]
#[display(fmt = "invalid player string")]
pub struct ParsePlayerError;

impl FromStr for Player {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "black" | "b" | "x" => Ok(Player::Black),
            "white" | "w" | "o" => Ok(Player::White),
            _ => Err(ParsePlayerError),
        }
    }
}

/// An action in an Othello game: pass or place a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Pass,
    Piece(Location),
}

impl From<Location> for Move {
    fn from(loc: Location) -> Self {
        Self::Piece(loc)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Pass => f.write_str("PASS"),
            Move::Piece(loc) => loc.fmt(f),
        }
    }
}

#[derive(Debug, Display, Error, PartialEq, From)]
#[display(fmt = "invalid move string")]
pub struct ParseMoveError {
    source: ParseLocationError,
}

/// Parse a [`Move`]: either a location ("D3") or "PASS".
impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pass") {
            return Ok(Move::Pass);
        }
        Ok(Move::Piece(s.parse()?))
    }
}

/// A contract violation when applying a move to a [`Game`].
#[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
pub enum GameError {
    #[display(fmt = "{} is not a legal move", _0)]
    IllegalMove(#[error(not(source))] Location),
    #[display(fmt = "cannot pass while moves are available")]
    IllegalPass,
    #[display(fmt = "the game is already finished")]
    GameFinished,
}

/// Who won a finished game.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Outcome {
    Black,
    White,
    Draw,
}

impl From<Player> for Outcome {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Outcome::Black,
            Player::White => Outcome::White,
        }
    }
}

/// The result of a finished game. Empty cells are credited to the winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Score {
    pub winner: Outcome,
    pub black_stones: u8,
    pub white_stones: u8,
}

impl Score {
    /// Black's stones minus White's stones.
    pub fn margin(self) -> i8 {
        self.black_stones as i8 - self.white_stones as i8
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Outcome::Draw => write!(f, "Draw")?,
            winner => write!(f, "{} wins", winner)?,
        }
        write!(f, " ({}-{})", self.black_stones, self.white_stones)
    }
}

/// The complete state of an Othello game.
///
/// Besides the board and the side to move, a game carries its ply counter
/// and the [`ParityState`] of its empty regions, updated on every move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Game {
    pub board: Board,
    pub active_player: Player,
    /// Number of turns taken so far, passes included.
    pub ply: u16,
    pub parity: ParityState,
}

impl Default for Game {
    fn default() -> Self {
        Self {
            board: Board::new(),
            active_player: Player::Black,
            ply: 0,
            parity: ParityState::new(),
        }
    }
}

impl Game {
    /// Start a game from an arbitrary board, seen from `active_player`'s perspective.
    /// Parity regions are recomputed from scratch.
    pub fn from_board(board: Board, active_player: Player) -> Self {
        Self {
            board,
            active_player,
            ply: board.occupied_mask().count_occupied().saturating_sub(4) as u16,
            parity: ParityState::from_board(board),
        }
    }

    /// Black's pieces.
    pub fn black_bitboard(&self) -> Bitboard {
        match self.active_player {
            Player::Black => self.board.active_bitboard,
            Player::White => self.board.opponent_bitboard,
        }
    }

    /// White's pieces.
    pub fn white_bitboard(&self) -> Bitboard {
        match self.active_player {
            Player::Black => self.board.opponent_bitboard,
            Player::White => self.board.active_bitboard,
        }
    }

    /// Get the list of legal piece placements for the active player.
    /// Empty if the player must pass.
    #[inline]
    pub fn get_moves(&self) -> LocationList {
        self.board.get_moves()
    }

    /// Count the empty spaces left on the board.
    #[inline]
    pub fn count_empties(&self) -> u8 {
        self.board.count_empties()
    }

    /// Whether the game is over: the board is full, a player has no
    /// pieces left, or both players have had to pass in a row.
    pub fn is_finished(&self) -> bool {
        self.board.empty_mask().is_empty()
            || self.board.active_bitboard.is_empty()
            || self.board.opponent_bitboard.is_empty()
            || (self.board.just_passed && self.get_moves().is_empty())
    }

    /// Apply a move for the active player, checking that it is legal.
    pub fn apply_move(&self, mv: Move) -> Result<Self, GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }

        let moves = self.get_moves();
        let (board, parity) = match mv {
            Move::Pass if moves.is_empty() => (self.board.pass(), self.parity),
            Move::Pass => return Err(GameError::IllegalPass),
            Move::Piece(loc) if moves.contains(loc) => {
                let flips = self.board.flips(loc);
                let mut parity = self.parity;
                parity.advance(loc, flips);
                (self.board.apply_flips(loc, flips), parity)
            }
            Move::Piece(loc) => return Err(GameError::IllegalMove(loc)),
        };

        Ok(Self {
            board,
            active_player: !self.active_player,
            ply: self.ply + 1,
            parity,
        })
    }

    /// The final score, or `None` if the game is still in progress.
    pub fn score(&self) -> Option<Score> {
        if !self.is_finished() {
            return None;
        }

        let mut black_stones = self.black_bitboard().count_occupied();
        let mut white_stones = self.white_bitboard().count_occupied();
        let empties = self.count_empties();

        let winner = if black_stones > white_stones {
            black_stones += empties;
            Outcome::Black
        } else if white_stones > black_stones {
            white_stones += empties;
            Outcome::White
        } else {
            Outcome::Draw
        };

        Some(Score {
            winner,
            black_stones,
            white_stones,
        })
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let black = self.black_bitboard().into_iter();
        let white = self.white_bitboard().into_iter();

        utils::format_grid(
            black.zip(white).map(|cell| match cell {
                (true, _) => 'X',
                (_, true) => 'O',
                _ => '.',
            }),
            f,
        )?;

        write!(f, "\n{} to move", self.active_player)?;
        if self.board.just_passed {
            f.write_str(" (last move was a pass)")?;
        }
        Ok(())
    }
}
