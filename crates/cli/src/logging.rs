use anyhow::Result;
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the CLI
///
/// Console output goes to stderr so command output on stdout stays clean.
/// With a `log_file` the same events are also appended there without colour.
pub fn init_logging(log_level: Level, log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(log_level).into());

    let file_layer = match log_file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(path)?)
                .with_ansi(false),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .init();

    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn default_filter(level: Level) -> String {
    let level_str = level.as_str().to_lowercase();
    format!("splitalgo={level_str},splitalgo_http={level_str},splitalgo_core={level_str}")
}
