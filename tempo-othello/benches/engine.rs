use criterion::*;

#[cfg(unix)]
use pprof::criterion::{Output, PProfProfiler};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tempo_othello::test_utils::{perft, random_game};
use tempo_othello::bitboard::Bitboard;
use tempo_othello::{Game, Location, ParityState};

fn criterion_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(50);

    for depth in 1..7 {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| perft::run_perft(black_box(depth)))
        });
    }

    group.finish();
}

fn criterion_parity(c: &mut Criterion) {
    let games: Vec<Vec<Game>> = (0..16)
        .map(|seed| random_game(&mut SmallRng::seed_from_u64(seed)))
        .collect();

    // The placement and flips of every non-pass turn, recovered from consecutive positions.
    let turns: Vec<Vec<(Location, Bitboard)>> = games
        .iter()
        .map(|history| {
            history
                .windows(2)
                .filter_map(|pair| {
                    let (before, after) = (pair[0].board, pair[1].board);
                    let placed = after.occupied_mask() & !before.occupied_mask();
                    if placed.is_empty() {
                        return None;
                    }
                    let flips = before.opponent_bitboard & !after.active_bitboard;
                    Some((Location::from_onehot(placed), flips))
                })
                .collect()
        })
        .collect();

    let mut group = c.benchmark_group("parity");

    group.bench_function("incremental", |b| {
        b.iter(|| {
            for game_turns in turns.iter() {
                let mut state = ParityState::new();
                for &(mv, flips) in game_turns.iter() {
                    state.advance(black_box(mv), flips);
                }
                black_box(state);
            }
        })
    });

    group.bench_function("recompute", |b| {
        b.iter(|| {
            for history in games.iter() {
                for game in history.iter() {
                    black_box(ParityState::from_board(black_box(game.board)));
                }
            }
        })
    });

    group.finish();
}

#[cfg(unix)]
criterion_group! {
    name = engine;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_perft, criterion_parity
}

#[cfg(not(unix))]
criterion_group! {
    name = engine;
    config = Criterion::default();
    targets = criterion_perft, criterion_parity
}

criterion_main!(engine);
