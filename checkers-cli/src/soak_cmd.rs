//! Soak command - random legal playouts that check engine invariants
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), report_results()
//! - Level 3: play_random_game(), check_consistency(), compute_statistics()
//! - Level 4: formatting utilities

use anyhow::{bail, Result};
use clap::Args;
use indicatif::ProgressBar;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use checkers_core::{GameConfig, GameOutcome, GameState, Side};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SoakArgs {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Moves after which a game counts as unfinished
    #[arg(long, default_value = "400")]
    pub max_moves: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    outcome: Option<GameOutcome>,
    moves: usize,
    captures: usize,
    promotions: usize,
}

/// Aggregated soak results
#[derive(Clone, Debug)]
struct SoakResults {
    games: Vec<GameRecord>,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    unfinished: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run soak command
///
/// 1. Play the requested number of games in parallel
/// 2. Fail on the first invariant violation
/// 3. Report results
pub fn run(args: SoakArgs, config: GameConfig, seed: Option<u64>) -> Result<()> {
    let base_seed = seed.unwrap_or_else(rand::random);

    tracing::info!(
        "Starting soak: {} games, max {} moves, seed={}, rules={:?}",
        args.games,
        args.max_moves,
        base_seed,
        config.rules
    );

    let results = play_games(&args, config, base_seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_games(args: &SoakArgs, config: GameConfig, base_seed: u64) -> Result<SoakResults> {
    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(args.games as u64)
    };

    let games = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i as u64);
            let record = play_random_game(config, seed, args.max_moves, i + 1);
            progress.inc(1);
            record
        })
        .collect::<Result<Vec<_>>>()?;

    progress.finish_and_clear();
    Ok(compute_statistics(games))
}

fn report_results(results: &SoakResults, args: &SoakArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play uniformly random legal moves from the standard layout
fn play_random_game(
    config: GameConfig,
    seed: u64,
    max_moves: usize,
    game_number: usize,
) -> Result<GameRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut game = GameState::new(config);
    let mut record = GameRecord {
        game_number,
        seed,
        outcome: None,
        moves: 0,
        captures: 0,
        promotions: 0,
    };

    while !game.is_game_over() && record.moves < max_moves {
        let moves = game.legal_moves();
        let &(from, to) = match moves.choose(&mut rng) {
            Some(mv) => mv,
            None => bail!("game {} (seed {}): ongoing game has no legal move", game_number, seed),
        };

        let mover = game.current_player();
        let report = match game.try_move(from, to).report() {
            Some(report) => *report,
            None => bail!(
                "game {} (seed {}): legal move {} -> {} was rejected",
                game_number,
                seed,
                from,
                to
            ),
        };

        check_consistency(&game, game_number, seed)?;
        if report.ended.is_none() && game.current_player() == mover {
            bail!("game {} (seed {}): turn did not pass after {} -> {}", game_number, seed, from, to);
        }

        record.moves += 1;
        record.captures += usize::from(report.captured.is_some());
        record.promotions += usize::from(report.promoted);
    }

    record.outcome = game.outcome();
    tracing::debug!(
        "Game {}: {:?} after {} moves",
        game_number,
        record.outcome,
        record.moves
    );
    Ok(record)
}

/// Board cells and the piece set must describe the same pieces
fn check_consistency(game: &GameState, game_number: usize, seed: u64) -> Result<()> {
    let occupied: Vec<_> = game.board().occupied().collect();
    if occupied.len() != game.pieces().len() {
        bail!(
            "game {} (seed {}): {} occupied cells but {} live pieces",
            game_number,
            seed,
            occupied.len(),
            game.pieces().len()
        );
    }
    for (square, id) in occupied {
        match game.pieces().get(id) {
            Some(piece) if piece.square == square => {}
            _ => bail!(
                "game {} (seed {}): piece {:?} out of sync at {}",
                game_number,
                seed,
                id,
                square
            ),
        }
    }
    Ok(())
}

fn compute_statistics(games: Vec<GameRecord>) -> SoakResults {
    let count = |wanted: Option<GameOutcome>| games.iter().filter(|g| g.outcome == wanted).count();
    let white_wins = count(Some(GameOutcome::Winner(Side::White)));
    let black_wins = count(Some(GameOutcome::Winner(Side::Black)));
    let draws = count(Some(GameOutcome::Draw));
    let unfinished = count(None);

    let total_moves: usize = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    SoakResults {
        games,
        white_wins,
        black_wins,
        draws,
        unfinished,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn outcome_label(outcome: Option<GameOutcome>) -> String {
    match outcome {
        Some(GameOutcome::Winner(side)) => format!("{} wins", side),
        Some(GameOutcome::Draw) => "Draw".to_string(),
        None => "Unfinished".to_string(),
    }
}

/// Print results as JSON
fn print_json_results(results: &SoakResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        seed: u64,
        outcome: Option<GameOutcome>,
        moves: usize,
        captures: usize,
        promotions: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        white_wins: usize,
        black_wins: usize,
        draws: usize,
        unfinished: usize,
        avg_moves: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        white_wins: results.white_wins,
        black_wins: results.black_wins,
        draws: results.draws,
        unfinished: results.unfinished,
        avg_moves: results.avg_moves,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                seed: g.seed,
                outcome: g.outcome,
                moves: g.moves,
                captures: g.captures,
                promotions: g.promotions,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &SoakResults) {
    let total = results.games.len();
    let pct = |n: usize| {
        if total > 0 {
            n as f32 / total as f32 * 100.0
        } else {
            0.0
        }
    };

    println!("\n=== Soak Results ===");
    println!("Total games: {}", total);
    println!("White wins:  {} ({:.1}%)", results.white_wins, pct(results.white_wins));
    println!("Black wins:  {} ({:.1}%)", results.black_wins, pct(results.black_wins));
    println!("Draws:       {} ({:.1}%)", results.draws, pct(results.draws));
    println!("Unfinished:  {} ({:.1}%)", results.unfinished, pct(results.unfinished));
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {} (seed {}): {} in {} moves, {} captures, {} crownings",
            game.game_number,
            game.seed,
            outcome_label(game.outcome),
            game.moves,
            game.captures,
            game.promotions
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use checkers_core::KingPass;

    fn record(outcome: Option<GameOutcome>, moves: usize) -> GameRecord {
        GameRecord {
            game_number: 1,
            seed: 0,
            outcome,
            moves,
            captures: 0,
            promotions: 0,
        }
    }

    #[test]
    fn test_compute_statistics_empty() {
        let results = compute_statistics(vec![]);
        assert_eq!(results.white_wins, 0);
        assert_eq!(results.black_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.unfinished, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_statistics() {
        let results = compute_statistics(vec![
            record(Some(GameOutcome::Winner(Side::White)), 10),
            record(Some(GameOutcome::Winner(Side::Black)), 20),
            record(Some(GameOutcome::Draw), 30),
            record(None, 40),
        ]);
        assert_eq!(results.white_wins, 1);
        assert_eq!(results.black_wins, 1);
        assert_eq!(results.draws, 1);
        assert_eq!(results.unfinished, 1);
        assert_eq!(results.avg_moves, 25.0);
    }

    #[test]
    fn test_random_game_deterministic() {
        let a = play_random_game(GameConfig::default(), 42, 200, 1).unwrap();
        let b = play_random_game(GameConfig::default(), 42, 200, 1).unwrap();
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.captures, b.captures);
    }

    #[test]
    fn test_random_games_hold_invariants() {
        let lenient = GameConfig::default().with_king_pass(KingPass::Lenient);
        for seed in 0..5 {
            let record = play_random_game(GameConfig::default(), seed, 300, 1).unwrap();
            assert!(record.moves <= 300);
            play_random_game(lenient, seed, 300, 1).unwrap();
        }
    }

    #[test]
    fn test_max_moves_leaves_game_unfinished() {
        let record = play_random_game(GameConfig::default(), 3, 2, 1).unwrap();
        assert_eq!(record.moves, 2);
        assert_eq!(record.outcome, None);
    }

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome_label(Some(GameOutcome::Winner(Side::Black))), "Black wins");
        assert_eq!(outcome_label(Some(GameOutcome::Draw)), "Draw");
        assert_eq!(outcome_label(None), "Unfinished");
    }
}
