use anyhow::Context;
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use slots_rs::autospin::AutoSpin;
use slots_rs::config::GameConfig;
use slots_rs::logging;
use slots_rs::machine::Machine;
use slots_rs::persist::SessionRecord;
use slots_rs::session::Session;
use slots_rs::sound::{SoundManager, TerminalBell};
use slots_rs::tui::{app::AppState, controller};
use std::io::{self, IsTerminal, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal slot machine")]
struct Args {
    /// Write verbose logs to the log file
    #[arg(long)]
    debug: bool,

    /// Log file used with --debug
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// JSON game configuration
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed the reels for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Load the session from this file at startup and save it on quit
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Enable sound effects from this directory of WAV files
    #[arg(long, value_name = "DIR")]
    sound_dir: Option<PathBuf>,

    /// Use rarity-weighted reels instead of uniform ones
    #[arg(long)]
    weighted: bool,
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Everything that can fail is checked here, before raw mode.
fn build_session(args: &Args) -> anyhow::Result<(Session, GameConfig)> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.weighted {
        config.use_rarity_weights()?;
    }
    if let Some(dir) = &args.sound_dir {
        config.sound.enabled = true;
        config.sound.dir = dir.clone();
    }
    config.validate()?;

    let source = config.random_source(args.seed)?;
    let mut machine = Machine::from_config(&config, source)?;
    if config.sound.enabled {
        let sound = SoundManager::load(&config.sound.dir, Box::new(TerminalBell::stdout()))?;
        machine = machine.with_sound(sound);
    }
    let mut session = Session::new(machine, AutoSpin::new(config.autospin_interval()));

    if let Some(path) = &args.save {
        let loaded = SessionRecord::load(path)
            .with_context(|| format!("cannot load session from {}", path.display()))?;
        if let Some(record) = loaded {
            record.restore(&mut session, config.bet_limits);
        }
    }
    Ok((session, config))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if !io::stdout().is_terminal() {
        println!(
            "slots-rs TUI requires a real terminal (TTY).\nRun in Terminal and press q to quit. Version: {}",
            slots_rs::VERSION
        );
        return Ok(());
    }
    if args.debug {
        let path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
        logging::init_file_logging(&path, true)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
    }

    let (session, config) = build_session(&args)?;
    info!(
        balance = session.state().balance(),
        seed = ?args.seed,
        autospin_ms = session.autospin().interval().as_millis() as u64,
        sound = session.machine().sound().enabled(),
        "session starting"
    );

    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(60);
    let mut app = AppState::new(session, config.animation_frames);

    let res = controller::run(&mut terminal, &mut app, tick_rate);

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    res?;

    if let Some(path) = &args.save {
        SessionRecord::capture(app.session())
            .save(path)
            .with_context(|| format!("cannot save session to {}", path.display()))?;
    }
    let stats = app.session().stats();
    info!(spins = stats.spins(), net = stats.net(), "session finished");
    Ok(())
}
