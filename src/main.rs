use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use overworld::battle::{BattleHandoff, EncounterFactory};
use overworld::build_info;
use overworld::core::constants::{ENCOUNTER_CHANCE, KEY_HOLD_WINDOW_MS, LOG_FILE_NAME};
use overworld::core::runtime::{run, spawn_input_capture};
use overworld::core::{Clock, Game, SystemClock};
use overworld::input::SharedInput;
use overworld::modes::{ModeRegistry, ModeSwitchboard};
use overworld::party::{load_or_starter, save_dir, JsonPartyStore};
use overworld::world::Overworld;

/// Logs go to a file: anything written to stdout would corrupt the TUI.
fn init_logging() {
    let Ok(dir) = save_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
    else {
        return;
    };

    let filter =
        EnvFilter::try_from_env("OVERWORLD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("Overworld - explore, battle, build your party\n");
                println!("Usage: overworld [option]\n");
                println!("Options:");
                println!("  --version  Show version information");
                println!("  --help     Show this help message\n");
                println!("Controls:");
                println!("  Arrows/WASD  Move / navigate");
                println!("  Z/Enter      Confirm");
                println!("  X/Esc        Back / open menu");
                println!("  Ctrl+C       Quit immediately");
                println!("\nSet OVERWORLD_LOG (e.g. debug) to change log verbosity.");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'overworld --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    init_logging();
    tracing::info!(version = %build_info::version_line(), "starting");

    let store = match JsonPartyStore::in_home_dir() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Cannot locate the save directory: {}", e);
            std::process::exit(1);
        }
    };
    let party = load_or_starter(&store);

    let clock = SystemClock::new();
    let game = Game::new(
        ModeSwitchboard::new(ModeRegistry::standard(ENCOUNTER_CHANCE)),
        BattleHandoff::new(Box::new(EncounterFactory)),
        Overworld::default(),
        party,
        Box::new(store),
        Box::new(rand::thread_rng()),
        clock.now_ms(),
    );
    let mut game = match game {
        Ok(game) => game,
        Err(e) => {
            tracing::error!(error = %e, "failed to build the game");
            eprintln!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;

    // Without release events a press counts as held for a short window.
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    let hold_window = (!enhanced).then_some(KEY_HOLD_WINDOW_MS);
    tracing::info!(enhanced, "keyboard mode selected");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let input = SharedInput::new(hold_window);
    let capture = spawn_input_capture(input.clone(), clock);
    let outcome = run(&mut terminal, &mut game, &input, &clock);

    input.request_quit();
    if capture.join().is_err() {
        tracing::warn!("input capture thread panicked");
    }

    // Cleanup terminal
    if enhanced {
        terminal.backend_mut().execute(PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;

    if let Err(e) = outcome {
        tracing::error!(error = %e, "game loop failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("exited cleanly");
    println!("Goodbye!");
    Ok(())
}
