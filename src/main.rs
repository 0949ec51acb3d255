use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cv_coach::app_log;
use cv_coach::console::run_console;
use cv_coach::core::{AppConfig, ConfigManager};
use cv_coach::start_web_server;
use std::fs::OpenOptions;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "cv_coach=info";

#[derive(Parser)]
#[command(name = "cvcoach")]
#[command(about = "Analyse a PDF CV and suggest matching or alternative jobs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the REST API
    Serve,
    /// Run the interactive numbered menu
    Console,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigManager::load()?;
    config.ensure_directories().await?;

    init_logging(&config, matches!(cli.command, Command::Serve))?;

    app_log!(
        info,
        "Environment: {}",
        std::env::var("CVCOACH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    );
    app_log!(info, "CV folder: {}", config.cv_folder.display());
    app_log!(info, "Storage backend: {:?}", config.storage);
    app_log!(info, "Model: {} at {}", config.openai.model, config.openai.base_url);
    if config.openai.api_key.is_none() {
        app_log!(warn, "OPENAI_API_KEY is not set; completion requests will be rejected");
    }

    match cli.command {
        Command::Serve => start_web_server(config).await,
        Command::Console => run_console(config).await,
    }
}

/// JSON lines to the log file; `serve` also gets readable output on stdout.
fn init_logging(config: &AppConfig, to_stdout: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stdout_layer = to_stdout.then(|| fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(stdout_layer)
        .with(filter)
        .init();

    Ok(())
}
