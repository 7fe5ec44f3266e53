//! Exhaustive endgame search.
//!
//! Scores are from the active player's perspective, counting empty cells for
//! the winner once the game is over.

use arrayvec::ArrayVec;
use std::sync::atomic::{AtomicBool, Ordering};
use tempo_othello::{Board, Location, NUM_SPACES};

/// Maximum achievable score.
pub const MAX_SCORE: i8 = NUM_SPACES as i8;

/// Below this many empties, stop sorting moves and stop checking for cancellation.
const MAX_SORT_DEPTH: u8 = 6;

// At most one move per empty cell, so child lists never exceed 64.

/// Solve the game, trying to determine the exact score.
/// Takes longer, but can be valuable for debugging or winning by a margin.
pub fn solve_exact(board: Board) -> i8 {
    solve_uncancelled(board, -MAX_SCORE, MAX_SCORE)
}

/// Solve the game, caring only about solving for a win, loss, or draw.
/// Faster, but provides less information.
pub fn solve_win_loss_draw(board: Board) -> i8 {
    solve_uncancelled(board, -1, 1)
}

fn solve_uncancelled(board: Board, alpha: i8, beta: i8) -> i8 {
    let running = AtomicBool::new(false);
    match window(board, alpha, beta, &running) {
        Some(score) => score,
        None => unreachable!("search cancelled without a cancellation request"),
    }
}

/// Find the move with the best exact outcome for the active player, and that outcome.
///
/// Returns `None` if there are no legal moves, or if `cancelled` is set before
/// the search finishes.
pub fn best_move(board: Board, cancelled: &AtomicBool) -> Option<(Location, i8)> {
    let empties = board.count_empties();
    let mut children: ArrayVec<[_; 64]> = board
        .get_moves()
        .map(|loc| (loc, board.apply_move(loc)))
        .collect();
    children.sort_unstable_by_key(|(_, child)| child.get_moves().num_moves());

    let mut best: Option<(Location, i8)> = None;
    for (loc, child) in children {
        let floor = best.map_or(-MAX_SCORE - 1, |(_, score)| score);
        let score = -window_fastest_first(child, empties - 1, -MAX_SCORE, -floor, cancelled)?;
        if score > floor {
            best = Some((loc, score));
        }
    }

    best
}

/// Window search from the root, returning `None` if cancelled.
/// Results are clamped to `[alpha, beta]`.
pub fn window(board: Board, alpha: i8, beta: i8, cancelled: &AtomicBool) -> Option<i8> {
    window_fastest_first(board, board.count_empties(), alpha, beta, cancelled)
}

/// Window search, using "fastest first" move ordering which first
/// explores moves where the opponent has the fewest legal moves.
fn window_fastest_first(
    board: Board,
    empties: u8,
    mut alpha: i8,
    beta: i8,
    cancelled: &AtomicBool,
) -> Option<i8> {
    if empties < MAX_SORT_DEPTH {
        return Some(window_unsorted(board, empties, alpha, beta));
    }

    if cancelled.load(Ordering::Relaxed) {
        return None;
    }

    let moves = board.get_moves();
    if moves.is_empty() {
        // Both players pass: game ends
        if board.just_passed {
            return Some(board.score_winner_gets_empties().max(alpha).min(beta));
        }

        // I pass, but my opponent may have moves
        return Some(-window_fastest_first(board.pass(), empties, -beta, -alpha, cancelled)?);
    }

    // Precompute all next states and their moves
    let mut next_states: ArrayVec<[_; 64]> = moves.map(|loc| board.apply_move(loc)).collect();
    next_states.sort_unstable_by_key(|s| s.get_moves().num_moves());

    // Visit states by lowest-mobility first
    for next_state in next_states {
        let score = -window_fastest_first(next_state, empties - 1, -beta, -alpha, cancelled)?;

        // Fail high: this branch has a line so good for me my opponent won't allow it
        if score >= beta {
            return Some(beta);
        }

        if score > alpha {
            alpha = score
        }
    }

    Some(alpha)
}

/// Window search without move ordering, which is faster for shallow trees.
fn window_unsorted(board: Board, empties: u8, mut alpha: i8, beta: i8) -> i8 {
    if empties == 0 {
        return board.score_absolute_difference().max(alpha).min(beta);
    }

    let moves = board.get_moves();
    if moves.is_empty() {
        if board.just_passed {
            return board.score_winner_gets_empties().max(alpha).min(beta);
        }

        return -window_unsorted(board.pass(), empties, -beta, -alpha);
    }

    for mv in moves {
        let score = -window_unsorted(board.apply_move(mv), empties - 1, -beta, -alpha);

        if score >= beta {
            return beta;
        }

        if score > alpha {
            alpha = score
        }
    }

    alpha
}
