//! Play command - two players share one terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_session() - the driver loop
//! - Level 3: handle_command(), report_events(), finish_game()
//! - Level 4: parsing and rendering utilities
//!
//! Each input line is either a cell ("col row") or a command. The first
//! cell selects a piece, the second attempts to move it.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use checkers_core::{
    GameConfig, GameEvent, GameState, NotificationKind, Side, Square, BOARD_COLS, BOARD_ROWS,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Stop after this many finished games (0 = until quit)
    #[arg(long, default_value = "0")]
    pub games: u32,

    /// Mark legal destinations of the selected piece
    #[arg(long)]
    pub hints: bool,
}

/// One line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Cell(Square),
    Moves,
    Reset,
    Help,
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command on stdin/stdout
pub fn run(args: PlayArgs, config: GameConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(stdin.lock(), &mut stdout, &args, config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Drive one session until input ends, the player quits, or the requested
/// number of games is done
fn run_session<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    args: &PlayArgs,
    config: GameConfig,
) -> Result<()> {
    let mut game = GameState::new(config);
    let mut finished = 0u32;

    tracing::info!("Starting session");
    writeln!(out, "{}", HELP)?;
    render(&game, args.hints, out)?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Some(command) => command,
            None => {
                writeln!(out, "Unrecognized input: {:?} (type 'help')", line.trim())?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        handle_command(&mut game, command, out)?;
        report_events(&mut game, out)?;

        if game.is_game_over() {
            finish_game(&mut game, out)?;
            finished += 1;
            if args.games > 0 && finished >= args.games {
                break;
            }
        }

        render(&game, args.hints, out)?;
    }

    writeln!(
        out,
        "Final score: White {} - Black {}",
        game.white_wins(),
        game.black_wins()
    )?;
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn handle_command<W: Write>(game: &mut GameState, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Cell(square) => {
            if let Some(outcome) = game.click(square) {
                if let Some(reason) = outcome.rejection() {
                    writeln!(out, "Rejected: {}", reason)?;
                }
            } else if game.selected().is_none() {
                writeln!(out, "Select one of your own pieces")?;
            }
        }
        Command::Moves => {
            let moves = game.legal_moves();
            let listed: Vec<String> = moves
                .iter()
                .map(|(from, to)| format!("{}->{}", from, to))
                .collect();
            writeln!(out, "Legal moves: {}", listed.join(" "))?;
        }
        Command::Reset => game.reset(),
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => {}
    }
    Ok(())
}

/// Print the cues a graphical front end would turn into sounds
fn report_events<W: Write>(game: &mut GameState, out: &mut W) -> Result<()> {
    game.expire_notifications(Instant::now());

    for event in game.drain_events() {
        match event {
            GameEvent::MoveCompleted { captured: true } => writeln!(out, "* capture *")?,
            GameEvent::MoveCompleted { captured: false } => {}
            GameEvent::MoveRejected => {}
            GameEvent::GameEnded { .. } => {}
        }
    }

    for note in game.notifications() {
        let marker = match note.kind {
            NotificationKind::Success => "+",
            NotificationKind::Error => "!",
            NotificationKind::Info => "-",
        };
        writeln!(out, "[{}] {}", marker, note.text)?;
    }
    Ok(())
}

/// Hold the final position for the postgame pause, then start over
fn finish_game<W: Write>(game: &mut GameState, out: &mut W) -> Result<()> {
    render(game, false, out)?;
    writeln!(
        out,
        "Score: White {} - Black {}",
        game.white_wins(),
        game.black_wins()
    )?;
    out.flush()?;

    let pause = game.config().timing.postgame_pause();
    std::thread::sleep(pause);
    game.tick(Instant::now());
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

const HELP: &str = "Enter a cell as 'col row' (0-7). First cell selects, second moves.\n\
Commands: moves, reset, help, quit";

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Some(Command::Quit),
        "m" | "moves" => return Some(Command::Moves),
        "reset" => return Some(Command::Reset),
        "h" | "help" | "?" => return Some(Command::Help),
        _ => {}
    }

    let mut parts = line.split(|c: char| c.is_whitespace() || c == ',').filter(|p| !p.is_empty());
    let col = parts.next()?.parse::<i8>().ok()?;
    let row = parts.next()?.parse::<i8>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Command::Cell(Square::new(col, row)))
}

/// Draw the board with row 7 at the top
fn render<W: Write>(game: &GameState, hints: bool, out: &mut W) -> Result<()> {
    let targets = match (hints, game.selected()) {
        (true, Some(piece)) => game.legal_destinations(piece.square),
        _ => vec![],
    };
    let selected = game.selected().map(|p| p.square);

    writeln!(out)?;
    for row in (0..BOARD_ROWS).rev() {
        write!(out, "{} ", row)?;
        for col in 0..BOARD_COLS {
            let square = Square::new(col, row);
            let glyph = match game.piece_at(square) {
                Some(piece) => piece_glyph(piece.side, piece.is_king),
                None if targets.contains(&square) => '*',
                None if square.is_dark() => '.',
                None => ' ',
            };
            if selected == Some(square) {
                write!(out, "[{}]", glyph)?;
            } else {
                write!(out, " {} ", glyph)?;
            }
        }
        writeln!(out)?;
    }
    write!(out, "  ")?;
    for col in 0..BOARD_COLS {
        write!(out, " {} ", col)?;
    }
    writeln!(out)?;

    if !game.is_game_over() {
        writeln!(out, "{} to move", game.current_player())?;
    }
    out.flush()?;
    Ok(())
}

fn piece_glyph(side: Side, is_king: bool) -> char {
    match (side, is_king) {
        (Side::White, false) => 'w',
        (Side::White, true) => 'W',
        (Side::Black, false) => 'b',
        (Side::Black, true) => 'B',
    }
}

// ============================================================================
// TESTS
// ============================================================================
