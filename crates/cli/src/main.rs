//! Brewdesk CLI - browse and manage coffee shops from the terminal

mod commands;
mod config;
mod logging;

use anyhow::Result;
use brewdesk_http::ClientError;
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::time::Duration;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "brewdesk")]
#[command(about = "Browse coffee shops and manage your own")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Data directory for the stored session, config and logs
    #[arg(short = 'd', long, global = true, env = "BREWDESK_STATE_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Client configuration file (defaults to <data-dir>/client.toml when present)
    #[arg(short = 'c', long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "30")]
    timeout: u64,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = config::resolve_data_dir(cli.data_dir);

    logging::init_logging(cli.log_level.into(), &data_dir, cli.no_file_log)?;
    info!("Starting Brewdesk CLI");

    let context = config::CommandContext::load(data_dir, cli.config)?;

    let outcome = if cli.timeout == 0 {
        cli.command.execute(context).await
    } else {
        let timeout_duration = Duration::from_secs(cli.timeout);
        match tokio::time::timeout(timeout_duration, cli.command.execute(context)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "command timed out after {} seconds",
                cli.timeout
            )),
        }
    };

    if let Err(e) = outcome {
        let status = e.downcast_ref::<ClientError>().and_then(ClientError::status);
        error!(?status, "Command failed: {e}");
        match status {
            Some(status) => eprintln!("error (HTTP {status}): {e}"),
            None => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
