//! tool-browser - Main Entry Point
//!
//! Loads the configuration, sets up file logging and runs the terminal browser
//! over the given directory.

use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use tool_browser::cli::{App, Config, TerminalGuard};
use tool_browser::llm::CohereClient;
use tool_browser::orchestrator::Orchestrator;
use tool_browser::tools::ToolRegistry;

#[derive(Parser, Debug)]
#[command(name = "tool-browser", version, about = "Browse code and ask a model about it")]
struct Cli {
    /// Directory to browse
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Log debug output for this crate
    #[arg(short, long)]
    verbose: bool,

    /// Log file; the terminal is owned by the UI
    #[arg(long, default_value = "tool-browser.log")]
    log_file: PathBuf,
}

/// Flushes buffered log lines when dropped
struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

fn setup_logging(cli: &Cli) -> Result<LogGuard> {
    let file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let default_filter = if cli.verbose {
        "warn,tool_browser=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    Ok(LogGuard { _guard: guard })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let _log_guard = setup_logging(&cli)?;

    let root = cli
        .path
        .canonicalize()
        .with_context(|| format!("Cannot open {}", cli.path.display()))?;

    let client = Arc::new(
        CohereClient::new(config.key.clone()).with_base_url(config.base_url.clone()),
    );
    let orchestrator = Orchestrator::new(
        client.clone(),
        ToolRegistry::new(&root),
        config.orchestrator_settings(),
    );

    info!(
        root = %root.display(),
        model = %config.model,
        base_url = client.base_url(),
        "starting tool-browser"
    );
    let mut app = App::new(&config, root, orchestrator)?;

    let mut guard = TerminalGuard::new()?;
    app.run(guard.terminal_mut()).await?;

    Ok(())
}
