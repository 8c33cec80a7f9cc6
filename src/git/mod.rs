//! Git state via the `git` command-line tool
//!
//! - `GitRunner` - Bounded, timeout-limited `git` subprocess execution
//! - `history` / `branches` / `status` - Fetchers that parse CLI output
//! - `aggregate` - Directory roll-up of file statuses
//! - `RepoSnapshot` - All of the above for one repository
//!
//! Fetchers never fail: a runner error becomes an empty result.

mod aggregate;
mod branches;
mod history;
mod runner;
mod snapshot;
mod status;

use std::path::Path;

pub use aggregate::*;
pub use branches::*;
pub use history::*;
pub use runner::*;
pub use snapshot::*;
pub use status::*;

use crate::error::{GitError, Result};

/// Fail with `NotARepository` unless `cwd` is inside a work tree
pub async fn require_repo<R: CommandRunner + ?Sized>(runner: &R, cwd: &Path) -> Result<()> {
    if is_repo(runner, cwd).await {
        Ok(())
    } else {
        Err(GitError::NotARepository(cwd.to_path_buf()).into())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runner for fetcher tests

    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::CommandRunner;
    use crate::error::{GitError, Result};

    /// Replays canned stdout keyed by git subcommand; unknown subcommands fail
    #[derive(Default)]
    pub struct FakeRunner {
        responses: HashMap<String, String>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, subcommand: &str, stdout: &str) -> Self {
            self.responses
                .insert(subcommand.to_string(), stdout.to_string());
            self
        }

        /// Argument vectors received so far
        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, _cwd: &Path, args: &[&str]) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push(args.iter().map(|a| a.to_string()).collect());

            let subcommand = args.first().copied().unwrap_or_default();
            self.responses.get(subcommand).cloned().ok_or_else(|| {
                GitError::CommandFailed {
                    command: format!("git {}", args.join(" ")),
                    stderr: "fatal: not a git repository".to_string(),
                }
                .into()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeRunner;
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_require_repo() {
        let runner = FakeRunner::new();
        let err = require_repo(&runner, Path::new("/tmp/x")).await.unwrap_err();
        assert!(matches!(err, Error::Git(GitError::NotARepository(_))));

        let runner = FakeRunner::new().respond("rev-parse", "true");
        assert!(require_repo(&runner, Path::new("/repo")).await.is_ok());
    }
}
