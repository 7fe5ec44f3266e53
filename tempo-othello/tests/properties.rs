//! Checks the bit-parallel engine against the ray-walk reference over random games.

use indicatif::ProgressIterator;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tempo_othello::bitboard::{self, Bitboard};
use tempo_othello::test_utils::{random_game, reference};
use tempo_othello::{bits, Game, ParityState, NUM_SPACES};

const NUM_GAMES: u64 = 200;

fn games() -> impl Iterator<Item = Vec<Game>> {
    (0..NUM_GAMES)
        .progress_count(NUM_GAMES)
        .map(|seed| random_game(&mut SmallRng::seed_from_u64(seed)))
}

#[test]
fn cells_are_partitioned() {
    for history in games() {
        for game in history {
            let board = game.board;
            assert!(!board.active_bitboard.intersects(board.opponent_bitboard));
            let total = board.active_bitboard.count_occupied()
                + board.opponent_bitboard.count_occupied()
                + board.empty_mask().count_occupied();
            assert_eq!(total as usize, NUM_SPACES);
        }
    }
}

#[test]
fn move_generation_matches_reference() {
    for history in games() {
        for game in history {
            let board = game.board;
            let fast = bitboard::get_move_mask(board.active_bitboard, board.opponent_bitboard);
            let slow = reference::move_mask(board.active_bitboard, board.opponent_bitboard);
            assert_eq!(fast, slow, "\n{}", board);
        }
    }
}

#[test]
fn flips_match_reference() {
    for history in games() {
        for game in history {
            let board = game.board;
            for loc in board.get_moves() {
                let expected = reference::flips(board.active_bitboard, board.opponent_bitboard, loc);
                assert_eq!(board.flips(loc), expected, "{} on\n{}", loc, board);
                assert!(!expected.is_empty());
            }
        }
    }
}

#[test]
fn parity_invariants_hold() {
    for history in games() {
        for game in history {
            let parity = game.parity;
            assert!(!parity.odd_area.intersects(parity.even_area));
            if !parity.early_turn {
                assert_eq!(parity.odd_area | parity.even_area, game.board.empty_mask());
            }
        }
    }
}

#[test]
fn incremental_parity_matches_recompute() {
    for history in games() {
        for game in history {
            let recomputed = ParityState::from_board(game.board);
            assert_eq!(game.parity.odd_area, recomputed.odd_area);
            assert_eq!(game.parity.even_area, recomputed.even_area);
            assert_eq!(game.parity.odd_count, recomputed.odd_count);
            assert_eq!(game.parity.even_count, recomputed.even_count);
            assert_eq!(game.parity.early_turn, recomputed.early_turn);
        }
    }
}

#[test]
fn flip_histogram_counts_every_stone() {
    for history in games() {
        let last = history.last().unwrap();
        let counted = last
            .parity
            .flip_histogram
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bucket| acc | bucket);
        assert_eq!(counted, last.board.occupied_mask());

        // Buckets never overlap.
        let total: u32 = last
            .parity
            .flip_histogram
            .iter()
            .map(|&bucket| bucket.count_occupied() as u32)
            .sum();
        assert_eq!(total, counted.count_occupied() as u32);
    }
}

#[test]
fn single_bits_round_trip() {
    for index in 0..NUM_SPACES as u8 {
        let onehot = bits::coord_at(index);
        assert_eq!(bits::coord_at(bits::index_of(onehot)), onehot);
        assert_eq!(bits::flip_left_right(bits::flip_left_right(onehot)), onehot);
        assert_eq!(bits::transpose(bits::transpose(onehot)), onehot);
    }
}
