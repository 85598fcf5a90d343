//! Blue Oyster - terminal back-office console
//!
//! Sales ledger and dining table overview for the admin API, rendered as
//! a TUI. Run with `--help` for the flags; every flag also reads an
//! `OYSTER_*` environment variable.

mod app;
mod form;
mod ledger;
mod ui;

use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use oyster_client::ClientConfig;
use oyster_client::config::{DEFAULT_ADMIN_URL, DEFAULT_TIMEOUT_SECS};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app::App;

/// Terminal back-office console for dining tables and expense tracking
#[derive(Parser, Debug)]
#[command(name = "blue-oyster", version, about)]
struct Args {
    /// Admin API base URL
    #[arg(long, env = "OYSTER_ADMIN_URL", default_value = DEFAULT_ADMIN_URL)]
    admin_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "OYSTER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Directory for daily rolling log files; logs always reach the Logs screen
    #[arg(long, env = "OYSTER_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

fn init_tracing(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = if let Ok(from_env) = EnvFilter::try_from_default_env() {
        from_env
    } else if cfg!(debug_assertions) {
        EnvFilter::new("info,blue_oyster=debug")
    } else {
        EnvFilter::new("info")
    };

    let registry = tracing_subscriber::registry()
        .with(tui_logger::tracing_subscriber_layer())
        .with(env_filter);

    let guard = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_appender = rolling::daily(dir, "blue-oyster.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer()
                .with_timer(LocalTimer)
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_writer(non_blocking_file);
            registry.with(file_layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    };

    // Adapter for dependencies that still log through the log crate
    tui_logger::init_logger(log::LevelFilter::Info).ok();
    tui_logger::set_default_level(log::LevelFilter::Info);

    Ok(guard)
}

/// Restore the terminal before the default panic output runs
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = init_tracing(args.log_dir.as_deref())?;

    tracing::info!(admin_url = %args.admin_url, "🦪 Blue Oyster console starting...");
    tracing::info!("Tab switches screens, q quits, r refreshes tables");

    let config = ClientConfig::new(&args.admin_url).with_timeout(args.timeout_secs);
    let mut app = App::new(config.build_client());
    app.dispatch_fetch();

    install_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = Duration::from_millis(100);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Settled fetches land between frames
        app.poll_fetch();

        if app.should_quit {
            return Ok(());
        }
    }
}
