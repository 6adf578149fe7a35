//! CLI configuration
//!
//! Layered lowest to highest: built-in defaults, `config.toml` in the config
//! directory (optional), `SPLITALGO_*` environment variables, then flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use splitalgo_http::DEFAULT_API_URL;
use std::path::Path;
use std::time::Duration;

/// Environment prefix, e.g. `SPLITALGO_API_URL`
pub const ENV_PREFIX: &str = "SPLITALGO";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliConfig {
    /// Base URL of the SplitAlgo API
    pub api_url: String,
    /// Per-command timeout in seconds, 0 for none
    pub timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 0,
        }
    }
}

impl CliConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if a value
    /// has the wrong type
    pub fn load(path: &Path) -> Result<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        Ok(settings.try_deserialize()?)
    }

    /// Apply command line flags on top of the loaded values
    #[must_use]
    pub fn with_overrides(mut self, api_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        self
    }

    pub const fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
