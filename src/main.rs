//! Clarify - select text in a page, transform it, splice it back reversibly.
//!
//! Main entry point for the Clarify CLI.

mod cli;
mod cmd_key;
mod cmd_page;

use anyhow::Context;
use clap::Parser;
use tracing::{error, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use clarify_config::{ConfigLoader, ConfigValidator, clarify_dir};

use crate::cli::{Cli, Commands};
use crate::cmd_page::TransformArgs;

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.clarify/logs/ with daily rotation.
fn init_tracing() -> anyhow::Result<()> {
    let log_dir = clarify_dir().join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("clarify")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the file writer flushing until exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console on stderr so page output on stdout stays clean.
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| clarify_dir().join("config.toml"));
    let config = ConfigLoader::load_or_default(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    if !validation.is_valid() {
        for err in &validation.errors {
            error!(path = %err.path, "{}", err.message);
        }
        anyhow::bail!("Invalid configuration in {}", config_path.display());
    }

    match cli.command {
        Commands::Transform {
            input,
            select,
            mode,
            apply,
            output,
        } => {
            cmd_page::handle_transform(
                &config,
                TransformArgs {
                    input,
                    select,
                    mode,
                    apply,
                    output,
                },
            )
            .await
        }
        Commands::Restore { input, output } => {
            let restored = cmd_page::handle_restore(&input, output.as_deref())?;
            if output.is_some() {
                println!("Restored {} region(s).", restored);
            }
            Ok(())
        }
        Commands::Ask { input, question } => cmd_page::handle_ask(&config, &input, &question).await,
        Commands::Key { action } => cmd_key::handle_key_command(&config.credentials, action),
    }
}
