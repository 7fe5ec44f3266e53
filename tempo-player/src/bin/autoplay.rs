//! Pit the arbiter against a random mover and log the tally.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempo_othello::{Game, Move, Outcome, Player};
use tempo_player::{Arbiter, ArbiterConfig, LinearModel, ScoringFunction};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play the arbiter against a random mover", long_about = None)]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Time allowed per move, in milliseconds
    #[arg(long, default_value_t = 1000)]
    deadline_ms: u64,

    /// Linear model (.npy) to score moves with; defaults to a positional heuristic
    #[arg(long)]
    model: Option<PathBuf>,

    /// Seed for the random mover and the rollout's tie-breaking
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Most empty cells the endgame search will take on
    #[arg(long, default_value_t = 12)]
    win_loss_empties: u8,
}

#[derive(Debug, Default)]
struct Tally {
    wins: usize,
    losses: usize,
    draws: usize,
}

fn play_game(arbiter: &Arbiter, arbiter_player: Player, rng: &mut SmallRng) -> Result<Game> {
    let mut game = Game::default();

    while !game.is_finished() {
        let mv = if game.active_player == arbiter_player {
            arbiter.play(&game)
        } else {
            game.get_moves().choose(&mut *rng).map_or(Move::Pass, Move::Piece)
        };
        debug!("{} plays {}", game.active_player, mv);
        game = game
            .apply_move(mv)
            .with_context(|| format!("{} is not playable in\n{}", mv, game))?;
    }

    Ok(game)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scorer: Arc<dyn ScoringFunction> = match &args.model {
        Some(path) => Arc::new(
            LinearModel::load(path)
                .with_context(|| format!("loading model from {}", path.display()))?,
        ),
        None => Arc::new(LinearModel::heuristic()),
    };

    let config = ArbiterConfig {
        deadline: Duration::from_millis(args.deadline_ms),
        win_loss_empties: args.win_loss_empties,
        seed: args.seed,
        ..ArbiterConfig::default()
    };
    let arbiter = Arbiter::with_scorer(config, scorer)?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let mut tally = Tally::default();

    for round in 0..args.games {
        let arbiter_player = if round % 2 == 0 { Player::Black } else { Player::White };
        let game = play_game(&arbiter, arbiter_player, &mut rng)?;
        let score = game
            .score()
            .context("finished game has no score")?;

        match score.winner {
            Outcome::Draw => tally.draws += 1,
            winner if winner == Outcome::from(arbiter_player) => tally.wins += 1,
            _ => tally.losses += 1,
        }
        info!("Game {} (arbiter as {}): {}", round + 1, arbiter_player, score);
    }

    info!(
        "Arbiter won {}, lost {}, drew {} of {} games",
        tally.wins, tally.losses, tally.draws, args.games
    );
    Ok(())
}
