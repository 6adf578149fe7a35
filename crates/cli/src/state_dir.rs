//! Platform-specific state directory management

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Where the CLI keeps its configuration, session and logs
pub struct StateDir {
    project_dirs: Option<ProjectDirs>,
    /// Set by `--data-dir`; config and data both live below it
    override_dir: Option<PathBuf>,
}

impl StateDir {
    pub fn new() -> Self {
        let project_dirs = ProjectDirs::from("io", "SplitAlgo", "splitalgo");
        if project_dirs.is_none() {
            warn!("Failed to determine platform-specific directories, will use fallback");
        }
        Self {
            project_dirs,
            override_dir: None,
        }
    }

    /// Keep everything below `path` instead of the platform directories
    pub fn with_override(path: impl Into<PathBuf>) -> Self {
        Self {
            project_dirs: None,
            override_dir: Some(path.into()),
        }
    }

    /// Platform directories unless `data_dir` was given
    pub fn resolve(data_dir: Option<PathBuf>) -> Self {
        data_dir.map_or_else(Self::new, Self::with_override)
    }

    pub fn config_dir(&self) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.join("config");
        }

        self.project_dirs.as_ref().map_or_else(
            || PathBuf::from("./config"),
            |dirs| dirs.config_dir().to_path_buf(),
        )
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.join("data");
        }

        self.project_dirs.as_ref().map_or_else(
            || PathBuf::from("./data"),
            |dirs| dirs.data_dir().to_path_buf(),
        )
    }

    /// Optional TOML configuration file
    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("config.toml")
    }

    /// Persistent session storage (token and cached user)
    pub fn session_path(&self) -> PathBuf {
        let path = self.data_dir().join("session.json");
        debug!(path = %path.display(), "Using session file");
        path
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("cli.log")
    }
}

impl Default for StateDir {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_override_directory() {
        let temp_dir = TempDir::new().unwrap();
        let state_dir = StateDir::with_override(temp_dir.path());

        assert_eq!(state_dir.config_dir(), temp_dir.path().join("config"));
        assert_eq!(state_dir.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            state_dir.config_path(),
            temp_dir.path().join("config").join("config.toml")
        );
        assert_eq!(
            state_dir.session_path(),
            temp_dir.path().join("data").join("session.json")
        );
        assert_eq!(
            state_dir.log_path(),
            temp_dir.path().join("data").join("cli.log")
        );
    }

    #[test]
    fn test_resolve_prefers_explicit_dir() {
        let temp_dir = TempDir::new().unwrap();
        let state_dir = StateDir::resolve(Some(temp_dir.path().to_path_buf()));
        assert!(state_dir.data_dir().starts_with(temp_dir.path()));
    }

    #[test]
    fn test_platform_directories() {
        let state_dir = StateDir::new();
        assert!(state_dir.config_path().ends_with("config.toml"));
        assert!(state_dir.session_path().ends_with("session.json"));
    }
}
