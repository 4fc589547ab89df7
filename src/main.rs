//! confdeck - Configuration Profile Dashboard
//!
//! A TUI for switching and monitoring configuration profiles.
//!
//! Features:
//! - Browse and switch named configuration profiles
//! - Usage statistics for switches and sessions
//! - Live process monitor and host status
//! - Maintenance toolbox (validation, log cleanup)
//!
//! Usage: confdeck [--dry-run]

mod app;
mod config;
mod nav;
mod profiles;
mod state;
mod sysmon;
mod types;
mod ui;

use anyhow::{Context, Result};
use app::App;
use config::Config;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use state::AppState;
use std::io::stdout;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let dry_run = args.iter().any(|a| a == "--dry-run" || a == "-n");

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("confdeck {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Run the application
    let result = run_app(dry_run).await;

    // Always try to restore terminal state, even on error
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"confdeck - Configuration Profile Dashboard

USAGE:
    confdeck [OPTIONS]

OPTIONS:
    -n, --dry-run    Show what would be done without executing
    -h, --help       Print help information
    -v, --version    Print version information

KEYBINDINGS:
    1-7              Switch tabs
    ]/[              Next/previous tab
    j/k              Navigate up/down
    Enter            Select/confirm
    r                Reload profiles
    p                Refresh process list (Processes tab)
    q                Quit

TABS:
    [1] Profiles     Browse and switch configuration profiles
    [2] Usage        Switch and session statistics
    [3] Processes    Live process monitor
    [4] Status       Host and store information
    [5] Toolbox      Maintenance actions
    [6] Settings     Configure theme, layout and display options
    [7] Help         Keybinding reference

CONFIG:
    ~/.config/confdeck/config.toml
    ~/.config/confdeck/profiles/*.toml
"#
    );
}

/// Set up file-based logging; stdout belongs to the TUI
fn init_logging(data_root: &Path) -> Result<()> {
    std::fs::create_dir_all(data_root)
        .with_context(|| format!("Failed to create data directory {:?}", data_root))?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_root.join("confdeck.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

async fn run_app(dry_run: bool) -> Result<()> {
    let config_root = Config::config_root()?;
    let data_root = Config::data_root()?;

    init_logging(&data_root)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), dry_run, "starting confdeck");

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Prepare the profile store
    let store = profiles::ProfileStore::new(&config_root, dry_run);
    store
        .ensure_layout()
        .context("Failed to prepare profile store")?;

    // Detect host environment
    let system_info = sysmon::detect_system(config_root, data_root.clone())
        .context("Failed to detect host environment")?;

    // Record the session start against the active profile
    let usage_log = profiles::usage::log_path(&data_root);
    if !dry_run {
        if let Ok(Some(active)) = store.active_name() {
            if let Err(e) = profiles::usage::record(&usage_log, &active, types::UsageAction::Session)
            {
                tracing::warn!(error = %e, "failed to record session event");
            }
        }
    }

    // Create application state; App kicks off the initial profile load
    let shared_state = Arc::new(AppState::new(store, usage_log));
    let (redraw_tx, redraw_rx) = mpsc::unbounded_channel();
    let mut app = App::new(config, system_info, shared_state, dry_run, redraw_tx);

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run main loop
    let result = main_loop(&mut terminal, &mut app, redraw_rx).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

async fn main_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut redraw_rx: mpsc::UnboundedReceiver<()>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(100));

    loop {
        // Render UI
        terminal.draw(|frame| {
            ui::render(frame, app);
        })?;

        // Wait for input, a state-change redraw signal, or the next tick
        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.handle_key(key)?;
                    }
                    Some(Ok(_)) => {} // resize/mouse: redrawn on next iteration
                    Some(Err(e)) => {
                        return Err(e).context("Terminal event stream failed");
                    }
                    None => break,
                }
            }
            _ = redraw_rx.recv() => {
                // Collapse a burst of signals into a single redraw
                while redraw_rx.try_recv().is_ok() {}
            }
            _ = ticker.tick() => {
                app.update_tick();
            }
        }

        // Check if should quit
        if app.should_quit {
            break;
        }
    }

    tracing::info!("shutting down");
    Ok(())
}
