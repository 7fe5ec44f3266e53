//! "Perft" performance test: count the number of leaves at a given depth.
//! Useful for tuning move generation and flips.
//! See: http://www.aartbik.com/MISC/reversi.html

use crate::Board;

/// Count the positions reachable in exactly `depth` turns from the start,
/// where a forced pass counts as a turn and finished games count as leaves.
pub fn run_perft(depth: u8) -> u64 {
    leaves_below(Board::new(), depth)
}

fn leaves_below(board: Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.get_moves();
    if moves.is_empty() {
        // Both players passed: game is over
        if board.just_passed {
            return 1;
        }

        return leaves_below(board.pass(), depth - 1);
    }

    moves
        .map(|mv| leaves_below(board.apply_move(mv), depth - 1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::run_perft;

    #[test]
    fn perft_shallow() {
        assert_eq!(run_perft(1), 4);
        assert_eq!(run_perft(2), 12);
        assert_eq!(run_perft(3), 56);
        assert_eq!(run_perft(4), 244);
    }

    #[test]
    fn perft_05() {
        assert_eq!(run_perft(5), 1396);
    }

    #[test]
    fn perft_06() {
        assert_eq!(run_perft(6), 8200);
    }

    #[test]
    fn perft_07() {
        assert_eq!(run_perft(7), 55092);
    }

    #[test]
    fn perft_08() {
        assert_eq!(run_perft(8), 390216);
    }

    // Passing moves begin here.
    #[test]
    #[ignore]
    fn perft_09() {
        assert_eq!(run_perft(9), 3005288);
    }

    #[test]
    #[ignore]
    fn perft_10() {
        assert_eq!(run_perft(10), 24571284);
    }
}
