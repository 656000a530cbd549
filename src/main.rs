//! Homework Status Bot - Main Entry Point
//!
//! Polls the homework review API on a fixed interval and reports status
//! changes for the most recent submission to a Telegram chat.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use homework_status_bot::api::PracticumClient;
use homework_status_bot::config::{BotSettings, Credentials};
use homework_status_bot::notify::TelegramNotifier;
use homework_status_bot::poller::{HomeworkPoller, PollerMessage, PollerState};

/// Telegram bot that watches homework review statuses.
#[derive(Parser, Debug)]
#[command(name = "homework_bot")]
#[command(about = "Watches homework review statuses and reports changes to Telegram")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Path of the log file (written in addition to stdout).
    #[arg(long, default_value = "homework_bot.log")]
    log_file: String,

    /// Override the poll interval in seconds.
    #[arg(short, long)]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, &args.log_file)
        .context("Failed to initialize logging")?;

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Credentials are checked before any client exists; a missing token is
    // the only terminal state.
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Required credentials are missing: {e}. The bot cannot start.");
            return Err(e).context("Failed to load credentials from environment");
        }
    };

    let mut settings = BotSettings::from_env_with_defaults();
    if let Some(interval) = args.interval {
        settings.poll_interval_secs = interval;
    }
    settings
        .validate()
        .context("Settings validation failed")?;

    info!(
        "Polling {} every {} seconds",
        settings.endpoint, settings.poll_interval_secs
    );

    let request_timeout = Duration::from_secs(settings.request_timeout_secs);

    let client = PracticumClient::new(
        credentials.practicum_token.clone(),
        settings.endpoint.clone(),
        request_timeout,
    )
    .context("Failed to create review API client")?;

    let notifier = TelegramNotifier::new(
        &credentials.telegram_token,
        credentials.chat_id.clone(),
        request_timeout,
    )
    .context("Failed to create Telegram notifier")?;

    let poller = HomeworkPoller::new(
        client,
        notifier,
        PollerState::new(),
        Duration::from_secs(settings.poll_interval_secs),
    );

    // Create poller control channel
    let (poller_tx, poller_rx) = mpsc::channel::<PollerMessage>(8);

    // Spawn poller task
    let poller_handle = tokio::spawn(async move {
        poller.run(poller_rx).await;
    });

    info!("Bot is running. Use Ctrl+C to stop.");

    // Wait for Ctrl+C
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    // Cleanup
    info!("Shutting down...");
    let _ = poller_tx.send(PollerMessage::Shutdown).await;
    let _ = poller_handle.await;

    Ok(())
}

/// Initializes the logging subsystem.
///
/// Log lines go both to stdout and to the given log file.
fn init_logging(level: &str, log_file: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Could not open log file: {log_file}"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();

    Ok(())
}
