use ghpc::app;
use ghpc::cli;
use ghpc::events;
use ghpc::input;
use ghpc::token;
use ghpc::tui;
use ghpc::update;

use app::{AppState, Command};
use clap::Parser;
use cli::{Cli, CliCommand};
use color_eyre::eyre::{eyre, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use events::{AppEvent, EventHandler};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    match args.command {
        Some(CliCommand::Version) => {
            println!("ghpc version {}", cli::VERSION);
            return Ok(());
        }
        Some(CliCommand::Update) => return update::run().await,
        None => {}
    }

    if args.verbose {
        setup_verbose_logging()?;
    }

    let mut state = AppState::new();

    // A token from the environment or the store skips manual entry; the
    // first packages fetch doubles as validation either way.
    let startup_cmd = token::get_token().map(|(tok, source)| state.start_with_token(tok, source));

    // Setup terminal with panic hook
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let events = EventHandler::new(Duration::from_millis(100));
    let tx = events.sender();

    if let Some(cmd) = startup_cmd {
        dispatch(cmd, &state, &tx);
    }

    let result = run_app(&mut terminal, &mut state, events, &tx).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    mut events: EventHandler,
    tx: &UnboundedSender<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| tui::render(f, state))?;

        if let Some(event) = events.next().await {
            let cmd = match event {
                AppEvent::Key(key) => {
                    let action = input::map_key(key, &state.input_context());
                    state.apply(action)
                }
                other => state.on_message(other),
            };
            if let Some(cmd) = cmd {
                dispatch(cmd, state, tx);
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

/// Executes an async command as a spawned task posting its result back onto
/// the event queue. Task bodies never touch session state.
fn dispatch(cmd: Command, state: &AppState, tx: &UnboundedSender<AppEvent>) {
    let Some(client) = state.client.clone() else {
        tracing::warn!("command issued without a client: {cmd:?}");
        return;
    };
    let tx = tx.clone();
    match cmd {
        Command::FetchPackages { gen } => {
            tokio::spawn(async move {
                let result = client.list_packages().await;
                let _ = tx.send(AppEvent::PackagesFetched { gen, result });
            });
        }
        Command::FetchVersions { gen, package } => {
            tokio::spawn(async move {
                let result = client.list_package_versions(&package).await;
                let _ = tx.send(AppEvent::VersionsFetched { gen, result });
            });
        }
        Command::DeleteVersion { gen, package, version_id } => {
            tokio::spawn(async move {
                let result = client.delete_package_version(&package, version_id).await;
                let _ = tx.send(AppEvent::DeleteResult { gen, version_id, result });
            });
        }
    }
}

fn setup_verbose_logging() -> Result<()> {
    let state_dir = state_dir_or_fallback();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!(
        "ghpc v{} starting with verbose logging",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn state_dir_or_fallback() -> std::path::PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        std::path::PathBuf::from(state).join("ghpc")
    } else if let Some(home) = std::env::var_os("HOME") {
        std::path::PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("ghpc")
    } else {
        std::path::PathBuf::from("/tmp/ghpc")
    }
}
