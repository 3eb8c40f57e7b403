mod app;
mod bootstrap;
mod cli;
mod config;
mod login;
mod runtime;
mod session_store;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hr_client::{HttpBackend, InMemoryBackend, LeaveBackend, MemoryTokenStore, SessionContext};
use ratatui::{backend::CrosstermBackend, Terminal};
use runtime::Services;
use session_store::FileTokenStore;
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();
    init_tracing()?;

    match cli.command {
        cli::Commands::ConfigPath => {
            let path = config::HrConfig::config_path()?;
            if !path.exists() {
                config::HrConfig::default().save()?;
                println!("Created default config at: {}", path.display());
            } else {
                println!("{}", path.display());
            }
        }
        cli::Commands::Login => {
            let cfg = config::HrConfig::load()?;
            let ctx = SessionContext::new(http_backend(&cfg)?, Arc::new(FileTokenStore::default_location()?));
            login::run_login(&ctx).await?;
        }
        cli::Commands::Logout => {
            let cfg = config::HrConfig::load()?;
            let ctx = SessionContext::new(http_backend(&cfg)?, Arc::new(FileTokenStore::default_location()?));
            ctx.teardown(None).context("Failed to remove session file")?;
            println!("Logged out. Session cleared.");
        }
        cli::Commands::Dev { hr } => {
            println!("Dev mode: using local in-memory data.\n");
            let backend: Arc<dyn LeaveBackend> = Arc::new(InMemoryBackend::seeded());
            let ctx = SessionContext::new(backend.clone(), Arc::new(MemoryTokenStore::new()));
            let session = bootstrap::dev_session(&ctx, hr).await?;
            let services = Services::new(backend, std::env::temp_dir());
            run_tui(session, services).await?;
        }
        cli::Commands::Run => {
            let cfg = config::HrConfig::load()?;
            let backend = http_backend(&cfg)?;
            let ctx = SessionContext::new(backend.clone(), Arc::new(FileTokenStore::default_location()?));
            let session = bootstrap::restore_session(&ctx).await?;
            println!("Signed in as {}.", session.user().full_name());
            let services = Services::new(backend, cfg.download_dir());
            run_tui(session, services).await?;
        }
    }

    Ok(())
}

fn http_backend(cfg: &config::HrConfig) -> Result<Arc<dyn LeaveBackend>> {
    let backend = HttpBackend::new(&cfg.api_url)
        .with_context(|| format!("Invalid api_url {}", cfg.api_url))?;
    Ok(Arc::new(backend))
}

/// Logs go to a file next to the config so the terminal UI stays intact.
fn init_tracing() -> Result<()> {
    let path = config::HrConfig::log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_tui(session: hr_client::Session, services: Services) -> Result<()> {
    let today = time::OffsetDateTime::now_utc()
        .to_offset(time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC))
        .date();
    let mut app = App::new(session, today);
    bootstrap::initialize_app_state(&mut app, &services).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, &services);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    println!("Goodbye!");
    Ok(())
}
