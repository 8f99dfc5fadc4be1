//! StreamAgg - terminal client for a media streaming aggregator
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! streamagg
//!
//! # CLI mode (for automation)
//! streamagg search "the bear" -t tv
//! streamagg resolve 136315 -t tv -s 1 -e 1 --json
//! ```

use std::fs::OpenOptions;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use streamagg::cli::{self, Cli, Command, ExitCode, Output};
use streamagg::config::{Config, ENV_LOG};
use streamagg::{commands, ui, App, BackendClient, Orchestrator};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

const TICK_RATE: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(url) = &cli.backend {
        config.backend_url = url.clone();
    }

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        init_logging(None)?;
        let exit_code = run_cli(cli, &config).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        let log_file = config.log_file.clone().or_else(Config::default_log_file);
        init_logging(log_file)?;
        run_tui(config).await
    }
}

/// Install the tracing subscriber; stderr unless a log file is given
fn init_logging(log_file: Option<PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("streamagg=info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);
    let client = BackendClient::with_timeout(&config.backend_url, config.timeout());

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &client, &output).await,

        Some(Command::Suggestions(cmd)) => commands::suggestions_cmd(cmd, &client, &output).await,

        Some(Command::Info(cmd)) => commands::info_cmd(cmd, &client, &output).await,

        Some(Command::Seasons(cmd)) => commands::seasons_cmd(cmd, &client, &output).await,

        Some(Command::Episodes(cmd)) => commands::episodes_cmd(cmd, &client, &output).await,

        Some(Command::Sources(cmd)) => {
            if let Err(e) = cli::validate_imdb_id(&cmd.imdb_id) {
                return output.error(e, ExitCode::InvalidArgs);
            }
            commands::sources_cmd(cmd, &client, &output).await
        }

        Some(Command::Resolve(cmd)) => commands::resolve_cmd(cmd, &client, &output).await,

        Some(Command::Play(cmd)) => commands::play_cmd(cmd, config, &output).await,

        // Handled by the is_cli_mode check
        None => ExitCode::Success,
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
async fn run_tui(config: Config) -> Result<()> {
    tracing::info!(backend = %config.backend_url, player = %config.player, "starting TUI");

    let client = BackendClient::with_timeout(&config.backend_url, config.timeout());
    let app = App::with_settings(config.settings());
    let mut orch = Orchestrator::new(
        app,
        client,
        config.local_player(),
        config.runtime_options(),
    );

    let mut terminal = init_terminal().context("initializing terminal")?;

    let result = run_event_loop(&mut terminal, &mut orch).await;
    orch.shutdown().await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - applies finished requests, handles input, renders UI
async fn run_event_loop(terminal: &mut Tui, orch: &mut Orchestrator) -> Result<()> {
    orch.start().await;

    while orch.app.running {
        orch.drain().await;

        terminal.draw(|frame| ui::render(frame, &orch.app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = orch.app.handle_key(key) {
                        orch.dispatch(action).await;
                    }
                }
            }
        }
    }

    tracing::info!("TUI exited");
    Ok(())
}
