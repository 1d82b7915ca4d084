//! hlsdeck - terminal browser and player for an HLS media library
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! hlsdeck
//! hlsdeck --origin http://nas.local:8000
//!
//! # CLI mode (for automation)
//! hlsdeck library --json
//! hlsdeck resolve Breaking_Bad Season_1 0
//! hlsdeck progress --clear
//! ```

use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use hlsdeck::api::{Backend, CatalogClient, CatalogError};
use hlsdeck::app::App;
use hlsdeck::cli::{Cli, Command, ExitCode, Output};
use hlsdeck::commands;
use hlsdeck::config::Config;
use hlsdeck::logging;
use hlsdeck::models::Catalog;
use hlsdeck::playback::PlaybackController;
use hlsdeck::progress::ProgressStore;
use hlsdeck::stream::{HeadlessMedia, MediaElement, MpvPlayer, PlayerKind};
use hlsdeck::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

/// How often the UI redraws and polls input, media and timers
const TICK_RATE: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        logging::init_stderr(config.log_level.as_deref().unwrap_or("warn"));
        let exit_code = run_cli(cli, &config).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        run_tui(cli, config).await
    }
}

fn progress_store(config: &Config) -> Result<ProgressStore> {
    match &config.progress_file {
        Some(path) => Ok(ProgressStore::new(path)),
        None => Ok(ProgressStore::open_default()?),
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);
    let backend = Backend::resolve(config.origin(cli.origin.as_deref()).as_deref());

    match cli.command {
        Some(Command::Library(cmd)) => commands::library_cmd(cmd, &backend, &output).await,

        Some(Command::Resolve(cmd)) => commands::resolve_cmd(cmd, &backend, &output).await,

        Some(Command::Progress(cmd)) => match progress_store(config) {
            Ok(store) => commands::progress_cmd(cmd, &backend, &store, &output).await,
            Err(e) => output.error(e.to_string(), ExitCode::Error),
        },

        None => {
            // This shouldn't happen (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(cli: Cli, config: Config) -> Result<()> {
    if let Some(path) = config.log_path() {
        logging::init_file(&path, config.log_level.as_deref().unwrap_or("info"))?;
    }

    // The origin is resolved once; every URL this session builds derives from it
    let backend = Backend::resolve(config.origin(cli.origin.as_deref()).as_deref());
    let store = progress_store(&config)?;
    let kind = cli.player.unwrap_or(config.player);
    tracing::info!(origin = backend.origin(), player = %kind, "starting TUI");

    match kind {
        PlayerKind::Mpv => {
            let media = MpvPlayer::new(config.mpv_command(), config.pip);
            run_app(media, backend, store).await
        }
        PlayerKind::Headless => {
            let media = HeadlessMedia::new().with_pip_enabled(config.pip);
            run_app(media, backend, store).await
        }
    }
}

async fn run_app<M: MediaElement>(media: M, backend: Backend, store: ProgressStore) -> Result<()> {
    // Single catalog fetch, delivered back to the UI loop
    let (tx, mut rx) = mpsc::channel(1);
    let client = CatalogClient::new(backend.clone());
    tokio::spawn(async move {
        let _ = tx.send(client.fetch().await).await;
    });

    let mut terminal = init_terminal()?;
    let mut app = App::new(PlaybackController::new(backend, media, store));

    // Run the main event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut rx).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, updates state, renders UI
async fn run_event_loop<M: MediaElement>(
    terminal: &mut Tui,
    app: &mut App<M>,
    catalog_rx: &mut mpsc::Receiver<Result<Catalog, CatalogError>>,
) -> Result<()> {
    let mut last_tick = Instant::now();

    while app.running {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if let Ok(result) = catalog_rx.try_recv() {
            app.on_catalog_loaded(result);
        }

        let now = Instant::now();
        let events = app.player.poll_media(now.duration_since(last_tick));
        last_tick = now;
        app.on_media_events(events);
        app.tick(now);
    }

    tracing::info!("exiting");
    Ok(())
}
