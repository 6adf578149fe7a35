//! SplitAlgo CLI - shared expenses and settlements

mod commands;
mod config;
mod logging;
mod state_dir;
mod views;

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use commands::{App, Commands};
use config::CliConfig;
use state_dir::StateDir;
use tracing::{Level, debug, info};

#[derive(Parser)]
#[command(name = "splitalgo")]
#[command(about = "Split shared expenses and settle them with SplitAlgo")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Directory for configuration, session and logs
    #[arg(short = 'd', long, global = true, env = "SPLITALGO_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Base URL of the SplitAlgo API
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Timeout for the command in seconds (0 = no timeout, the default)
    #[arg(short = 't', long, global = true)]
    timeout: Option<u64>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let state_dir = StateDir::resolve(cli.data_dir);
    let log_file = (!cli.no_file_log).then(|| state_dir.log_path());
    logging::init_logging(cli.log_level.into(), log_file.as_deref())?;

    let config =
        CliConfig::load(&state_dir.config_path())?.with_overrides(cli.api_url, cli.timeout);
    info!(api_url = %config.api_url, "Starting SplitAlgo CLI");

    let app = App::open(&state_dir, &config)?;

    let result = match config.timeout() {
        None => cli.command.execute(&app).await,
        Some(duration) => tokio::time::timeout(duration, cli.command.execute(&app))
            .await
            .unwrap_or_else(|_| {
                Err(anyhow!(
                    "Command timed out after {} seconds",
                    config.timeout_secs
                ))
            }),
    };

    if let Err(e) = result {
        debug!(error = ?e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    info!("Command completed successfully");
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nested_command_with_globals() {
        let cli = Cli::try_parse_from([
            "splitalgo",
            "--api-url",
            "http://127.0.0.1:9000/api",
            "groups",
            "add-member",
            "g-1",
            "u-2",
            "--timeout",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:9000/api"));
        assert_eq!(cli.timeout, Some(10));
        assert!(matches!(
            cli.command,
            Commands::Groups {
                command: commands::GroupCommands::AddMember { .. }
            }
        ));
    }

    #[test]
    fn test_login_return_to() {
        let cli = Cli::try_parse_from([
            "splitalgo",
            "login",
            "--email",
            "alex@example.com",
            "--password",
            "hunter22",
            "--return-to",
            "/groups",
        ])
        .unwrap();

        match cli.command {
            Commands::Login { return_to, .. } => assert_eq!(return_to.as_deref(), Some("/groups")),
            _ => panic!("expected login"),
        }
    }
}
