//! Error types for gitlane
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.
//!
//! Only the command runner produces [`GitError`]s. The fetchers in [`crate::git`]
//! convert every runner failure into an empty result, so these errors surface
//! to callers only through [`crate::git::CommandRunner::run`] and
//! [`crate::git::require_repo`].

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type for gitlane
#[derive(Error, Debug)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
}

/// Git invocation errors
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("Git command failed: {command} - {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Git command timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Semaphore acquire failed")]
    SemaphoreClosed,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// TUI-related errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Failed to initialize terminal: {0}")]
    InitFailed(String),

    #[error("Failed to restore terminal: {0}")]
    RestoreFailed(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitError::NotARepository(PathBuf::from("/tmp/foo"));
        assert!(err.to_string().contains("/tmp/foo"));

        let err = GitError::Timeout(Duration::from_secs(5));
        assert!(err.to_string().contains("timed out"));

        let err = GitError::CommandFailed {
            command: "git log".to_string(),
            stderr: "fatal: bad revision".to_string(),
        };
        assert!(err.to_string().contains("git log"));
        assert!(err.to_string().contains("fatal: bad revision"));
    }

    #[test]
    fn test_error_conversion() {
        let git_err = GitError::SemaphoreClosed;
        let top_err: Error = git_err.into();
        assert!(matches!(top_err, Error::Git(GitError::SemaphoreClosed)));

        let config_err = ConfigError::LoadFailed("bad toml".to_string());
        let top_err: Error = config_err.into();
        assert!(top_err.to_string().contains("bad toml"));
    }
}
