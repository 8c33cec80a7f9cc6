//! Async git command runner with semaphore-controlled concurrency
//!
//! Provides bounded git command execution with:
//! - Semaphore to limit concurrent git processes (default: 8)
//! - Timeout handling (default: 5 seconds, child is killed on expiry)
//! - Right-trimmed UTF-8 output, never partial

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::error::{GitError, Result};

/// Executable looked up on `PATH`
pub const GIT_PROGRAM: &str = "git";

/// Default maximum concurrent git processes
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Default command timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that can run a git command in a working directory.
///
/// `args` is passed to the process as-is; no shell is involved.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `git <args>` in `cwd` and return stdout with trailing whitespace removed
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<String>;
}

/// Runs the `git` binary as a child process
///
/// Each invocation, including the wait for a concurrency permit, is bounded by
/// [`DEFAULT_TIMEOUT`]. `with_timeout` exists for hosts that need a different
/// bound (the `git_timeout_ms` setting); the fetchers never change it.
#[derive(Clone)]
pub struct GitRunner {
    /// Semaphore for concurrency control
    semaphore: Arc<Semaphore>,
    /// Command timeout
    timeout: Duration,
}

impl GitRunner {
    /// Create a new runner with default settings
    pub fn new() -> Self {
        Self::with_max_concurrent(DEFAULT_MAX_CONCURRENT)
    }

    /// Create a runner with a custom concurrency limit
    pub fn with_max_concurrent(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the command timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Refuse further invocations
    ///
    /// Calls waiting for a permit and every later call fail with
    /// `GitError::SemaphoreClosed`. Children already running finish normally.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Check if git is installed and accessible
    pub async fn check_installed(&self) -> bool {
        match Command::new(GIT_PROGRAM)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                debug!("{}", String::from_utf8_lossy(&output.stdout).trim());
                true
            }
            _ => false,
        }
    }
}

impl Default for GitRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for GitRunner {
    #[instrument(skip(self), fields(cwd = %cwd.display()))]
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<String> {
        let command = format!("{} {}", GIT_PROGRAM, args.join(" "));

        // Waiting for a permit counts against the same deadline as the child
        let invocation = async {
            let _permit = self
                .semaphore
                .acquire()
                .await
                .map_err(|_| GitError::SemaphoreClosed)?;

            let mut cmd = Command::new(GIT_PROGRAM);
            cmd.args(args)
                .current_dir(cwd)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            cmd.output().await.map_err(|source| {
                warn!("failed to spawn git: {}", source);
                GitError::SpawnFailed {
                    command: command.clone(),
                    source,
                }
            })
        };

        match timeout(self.timeout, invocation).await {
            Ok(Ok(output)) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout)
                        .trim_end()
                        .to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                    Err(GitError::CommandFailed { command, stderr }.into())
                }
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                warn!("{} timed out after {:?}", command, self.timeout);
                Err(GitError::Timeout(self.timeout).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::git::get_commits;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_runner_creation() {
        let runner = GitRunner::new();
        assert_eq!(runner.timeout(), DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_runner_with_custom_settings() {
        let runner = GitRunner::with_max_concurrent(2).with_timeout(Duration::from_secs(10));

        assert_eq!(runner.timeout(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_missing_cwd_is_spawn_failure() {
        let runner = GitRunner::new();
        let result = runner
            .run(Path::new("/definitely/not/a/real/dir"), &["status"])
            .await;

        assert!(matches!(
            result,
            Err(Error::Git(GitError::SpawnFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_non_repo_is_command_failure() {
        let runner = GitRunner::new();
        let dir = TempDir::new().unwrap();
        let result = runner
            .run(dir.path(), &["rev-parse", "--is-inside-work-tree"])
            .await;

        assert!(matches!(
            result,
            Err(Error::Git(GitError::CommandFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_expired_deadline_is_timeout() {
        let runner = GitRunner::new().with_timeout(Duration::ZERO);
        let dir = TempDir::new().unwrap();

        let result = runner.run(dir.path(), &["log"]).await;
        assert!(matches!(
            result,
            Err(Error::Git(GitError::Timeout(d))) if d == Duration::ZERO
        ));

        // fetchers swallow the timeout
        assert!(get_commits(&runner, dir.path(), 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_permit_wait_counts_toward_timeout() {
        let runner = GitRunner::with_max_concurrent(1).with_timeout(Duration::from_millis(100));
        let _held = runner.semaphore.acquire().await.unwrap();
        let dir = TempDir::new().unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            runner.run(dir.path(), &["status"]),
        )
        .await
        .expect("run must give up on its own deadline");

        assert!(matches!(result, Err(Error::Git(GitError::Timeout(_)))));
    }

    #[tokio::test]
    async fn test_closed_runner_refuses_calls() {
        let runner = GitRunner::new();
        runner.close();

        let result = runner.run(Path::new("."), &["--version"]).await;
        assert!(matches!(
            result,
            Err(Error::Git(GitError::SemaphoreClosed))
        ));
    }
}
