use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use accounts::{UserStore, DEFAULT_DB_FILE};
use anyhow::Context;
use clap::Parser;
use client_tui::{settings, App};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};

#[derive(Parser, Debug)]
#[command(name = "deception-pong")]
#[command(about = "Terminal Pong with AI tiers, accounts and a deception mode", long_about = None)]
struct Cli {
    /// JSON settings file overriding the game defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// User database
    #[arg(long, default_value = DEFAULT_DB_FILE)]
    users: PathBuf,

    /// Seed for reproducible matches
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "deception_pong.log")]
    log_file: PathBuf,
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;
    log::info!("Deception Pong starting (seed: {:?})", cli.seed);

    let config = settings::load_config(cli.config.as_deref());
    let store = UserStore::open(cli.users);

    let terminal = ratatui::init();
    let mut stdout = io::stdout();
    let release_events = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && match stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        )) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Key release events unavailable: {}", e);
                false
            }
        };

    let mut app = App::new(store, config, cli.seed, release_events);
    let app_result = app.run(terminal);

    if release_events {
        if let Err(e) = stdout.execute(PopKeyboardEnhancementFlags) {
            log::warn!("Could not restore keyboard flags: {}", e);
        }
    }
    ratatui::restore();

    match &app_result {
        Ok(()) => println!("Thanks for playing Deception Pong!"),
        Err(e) => log::error!("Exited with error: {:#}", e),
    }
    app_result
}
