//! User configuration settings
//!
//! Layered configuration: defaults → config file → environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};
use crate::git::{GitRunner, DEFAULT_MAX_COUNT, DEFAULT_TIMEOUT};

/// Prefix for environment overrides (`GITLANE_GIT_TIMEOUT_MS`, ...)
pub const ENV_PREFIX: &str = "GITLANE_";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timeout for a single git invocation in milliseconds
    ///
    /// Defaults to the runner's fixed 5 s bound. Only the CLI and viewer read
    /// it when building their runner.
    pub git_timeout_ms: u64,

    /// Maximum concurrent git processes
    pub max_concurrent_git: usize,

    /// Commits fetched per refresh (clamped to 1..=1000)
    pub max_commits: i64,

    /// Seconds between automatic viewer refreshes (0 = manual only)
    pub refresh_interval_secs: u64,

    /// UI refresh rate in FPS
    pub ui_refresh_fps: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Log file path used while the viewer owns the terminal
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            max_concurrent_git: 8,
            max_commits: DEFAULT_MAX_COUNT,
            refresh_interval_secs: 5,
            ui_refresh_fps: 30,
            debug: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration using a specific file in place of the default one
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config: Config = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Layer config file if it exists
            .merge(Toml::file(config_path))
            // Layer environment variables
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Where viewer logs go
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("gitlane.log"))
    }

    pub fn git_timeout(&self) -> Duration {
        Duration::from_millis(self.git_timeout_ms)
    }

    /// Build the git runner these settings describe
    pub fn runner(&self) -> GitRunner {
        GitRunner::with_max_concurrent(self.max_concurrent_git).with_timeout(self.git_timeout())
    }

    /// Save current configuration to the default file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save current configuration to `config_path`
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_e| {
                Error::Config(ConfigError::DirectoryCreationFailed(parent.to_path_buf()))
            })?;
        }

        let toml =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        std::fs::write(config_path, toml).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "gitlane", "gitlane").ok_or_else(|| {
            Error::Config(ConfigError::LoadFailed(
                "Could not determine home directory".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.git_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_commits, 50);
        assert_eq!(config.max_concurrent_git, 8);
        assert_eq!(config.refresh_interval_secs, 5);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("git_timeout_ms"));
        assert!(toml.contains("max_commits"));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "max_commits = 200\ngit_timeout_ms = 1500\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.max_commits, 200);
        assert_eq!(config.git_timeout(), Duration::from_millis(1500));
        assert_eq!(config.ui_refresh_fps, 30);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.max_commits, DEFAULT_MAX_COUNT);
    }

    #[test]
    fn test_save_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let config = Config {
            refresh_interval_secs: 0,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.refresh_interval_secs, 0);
    }

    #[test]
    fn test_default_runner_keeps_fixed_timeout() {
        assert_eq!(Config::default().runner().timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_runner_uses_timeout() {
        let config = Config {
            git_timeout_ms: 250,
            ..Config::default()
        };
        assert_eq!(config.runner().timeout(), Duration::from_millis(250));
    }
}
