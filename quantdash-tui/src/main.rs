//! QuantDash TUI — four-panel terminal dashboard for backtest results.
//!
//! Panels:
//! 1. Tasks — every backend task with status and progress
//! 2. Results — per-symbol results with filter/sort, select, compare toggle
//! 3. Compare — up to four tasks side by side, best value per metric starred
//! 4. Help — keyboard shortcuts

mod app;
mod input;
mod theme;
mod ui;
mod worker;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use quantdash_core::config::{default_config_path, QuantDashConfig};
use quantdash_core::source::{HttpResultSource, OfflineSource};
use quantdash_core::ResultSource;

use crate::app::AppState;
use crate::worker::WorkerCommand;

#[derive(Parser)]
#[command(name = "quantdash-tui", about = "Terminal dashboard for backtest results", version)]
struct Args {
    /// Config file (default: <config dir>/quantdash/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and QUANTDASH_API_URL
    #[arg(long)]
    api_url: Option<String>,

    /// Never contact the backend; show demo data
    #[arg(long)]
    offline: bool,

    /// Auto-refresh interval in seconds (0 disables)
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Skip the welcome overlay
    #[arg(long)]
    no_welcome: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_path = init_logging();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = QuantDashConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?
        .with_env_overrides();
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    if let Some(secs) = args.refresh_secs {
        config.ui.auto_refresh_secs = Some(secs);
    }
    if args.no_welcome {
        config.ui.welcome = false;
    }

    let (source, source_name, source_warning) = build_source(&config, args.offline);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle =
        worker::spawn_worker(source, cmd_rx, resp_tx).context("spawning worker thread")?;

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, source_name, &config.ui);
    app.request_refresh();
    if let Some(warning) = source_warning {
        app.set_warning(warning);
    } else if let Some(path) = log_path {
        log::info!("logging to {}", path.display());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let tick = Duration::from_millis(config.ui.tick_ms.max(10));
    let result = run_app(&mut terminal, &mut app, tick);

    // Shutdown worker. A refresh in flight finishes first.
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    tick: Duration,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 3. Poll for input events
        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Periodic refresh
        if app.refresh_due(Instant::now()) {
            app.request_refresh();
        }

        // 5. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

/// Pick the result source. An unusable backend URL degrades to offline mode
/// rather than aborting, so the dashboard still opens on demo data.
/// Pick the worker's source. Returns the source, the name shown in the
/// status bar, and a warning when the configured backend cannot be used.
fn build_source(
    config: &QuantDashConfig,
    offline: bool,
) -> (Box<dyn ResultSource>, String, Option<String>) {
    if offline {
        return (Box::new(OfflineSource), OfflineSource.name().to_string(), None);
    }
    match HttpResultSource::new(&config.api) {
        Ok(source) => {
            let name = source.base_url().to_string();
            (Box::new(source), name, None)
        }
        Err(err) => {
            log::error!("cannot use backend {}: {err}", config.api.base_url);
            (
                Box::new(OfflineSource),
                OfflineSource.name().to_string(),
                Some(format!("{err}; running offline")),
            )
        }
    }
}

/// Route `log` output to `<data dir>/quantdash/tui.log`; stderr would corrupt
/// the alternate screen. Returns the log path when logging is active.
fn init_logging() -> Option<PathBuf> {
    let dir = dirs::data_local_dir()?.join("quantdash");
    std::fs::create_dir_all(&dir).ok()?;
    let path = dir.join("tui.log");
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()
        .ok()?;
    Some(path)
}
