//! Pass-and-play console driver for Nachthaus.
//!
//! Owns everything the engine treats as external: reading input,
//! printing and clearing the screen, the hand-the-keyboard-over prompt
//! between turns, and the sanity-based text corruption applied to
//! flushed messages.

mod corruption;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use rand::SeedableRng;
use rand::rngs::StdRng;

use nh_core::{GameState, Player, World};
use nh_engine::{FileScenario, GameEngine, MeetScenario, Scenario};

#[derive(Parser)]
#[command(
    name = "nachthaus",
    about = "Nachthaus — a two-player pass-and-play text adventure",
    version
)]
struct Cli {
    /// Directory containing rooms.json and items.json
    /// (default: the built-in "Find Each Other" scenario)
    #[arg(short = 'd', long)]
    scenario_dir: Option<PathBuf>,

    /// RNG seed for a deterministic session
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let scenario: Box<dyn Scenario> = match &cli.scenario_dir {
        Some(dir) => Box::new(FileScenario::from_dir(dir)?),
        None => Box::new(MeetScenario),
    };
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let state = GameState::new(
        World::new(),
        vec![Player::new("P1", "Player 1"), Player::new("P2", "Player 2")],
    );
    let mut engine = GameEngine::new(state, scenario, rng)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("{}", "=== Nachthaus (Pass & Play) ===".bold());
    println!("Scenario: {}", engine.scenario_name());
    flush_messages(&mut engine, None);

    while engine.state().is_active() {
        let Some(player_id) = engine.state().current_player_id().map(str::to_string) else {
            break;
        };
        let player_name = engine.state().player(&player_id)?.name.clone();

        println!();
        println!(
            "{}",
            format!("--- Turn {} ---", engine.state().turn_number()).bold()
        );
        println!("It is {player_name}'s turn. (Pass the keyboard to them.)");
        print!("Press Enter when ready... ");
        io::stdout().flush()?;
        if read_line(&mut input)?.is_none() {
            break;
        }

        clear_screen();

        engine.describe_surroundings(&player_id)?;
        flush_messages(&mut engine, Some(&player_id));

        // Stay with this player until a command spends the turn.
        while engine.state().is_active() {
            println!();
            println!("{player_name}, what do you do? (Type 'help' for commands.)");
            print!("> ");
            io::stdout().flush()?;

            let command = match read_line(&mut input)? {
                Some(line) => line.trim().to_string(),
                // End of input counts as walking away.
                None => "quit".to_string(),
            };

            if matches!(command.to_lowercase().as_str(), "end" | "quit" | "exit") {
                engine.state_mut().end_session(None);
                engine
                    .state_mut()
                    .push_message("You choose to abandon this place... for now.");
                flush_messages(&mut engine, Some(&player_id));
                break;
            }

            let turn_consumed = engine.process_command(&player_id, &command)?;
            flush_messages(&mut engine, Some(&player_id));

            if !engine.state().is_active() {
                break;
            }
            if turn_consumed {
                engine.end_of_turn(&player_id)?;
                flush_messages(&mut engine, Some(&player_id));
                break;
            }
        }

        if !engine.state().is_active() {
            break;
        }
        engine.state_mut().advance_turn();
    }

    println!();
    println!("Game over.");
    Ok(())
}

/// Read one line, or `None` at end of input.
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Print and clear all pending messages, garbling them according to the
/// active player's sanity. Pass `None` before the first turn, when no
/// player is acting yet.
fn flush_messages(engine: &mut GameEngine, player_id: Option<&str>) {
    let sanity = player_id.and_then(|id| engine.state().player(id).ok().map(Player::sanity));
    let messages = engine.state_mut().drain_messages();
    if messages.is_empty() {
        return;
    }

    let mut rng = rand::rng();
    println!();
    for message in messages {
        let text = match sanity {
            Some(sanity) => corruption::degrade_text(&message, sanity, &mut rng),
            None => message,
        };
        println!("{text}");
        println!();
    }
}

/// Best-effort screen clear between players, so the next player does not
/// see what the previous one read. Failures are ignored; a scrolled
/// screen is better than a crashed session.
fn clear_screen() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0));
}
