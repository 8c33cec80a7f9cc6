//! Everything a history view needs about one repository, fetched together

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use super::aggregate::aggregate;
use super::branches::{current_branch, get_branches, Branch};
use super::history::{get_commits, is_repo, Commit};
use super::runner::CommandRunner;
use super::status::{get_status, FileStatus};
use crate::graph::{build_graph, GraphRow};

/// History, branches and status for one working directory
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSnapshot {
    pub root: PathBuf,
    pub is_repo: bool,
    pub commits: Vec<Commit>,
    pub branches: Vec<Branch>,
    /// Files and their ancestor directories
    pub status: BTreeMap<PathBuf, FileStatus>,
}

impl RepoSnapshot {
    /// Fetch a fresh snapshot of `cwd`
    ///
    /// Commits, branches and status are fetched concurrently once `cwd` is
    /// known to be a repository. Outside a repository the snapshot is empty.
    #[instrument(skip(runner), fields(cwd = %cwd.display()))]
    pub async fn load<R: CommandRunner + ?Sized>(runner: &R, cwd: &Path, max_count: i64) -> Self {
        if !is_repo(runner, cwd).await {
            return Self {
                root: cwd.to_path_buf(),
                ..Self::default()
            };
        }

        let (commits, branches, files) = tokio::join!(
            get_commits(runner, cwd, max_count),
            get_branches(runner, cwd),
            get_status(runner, cwd),
        );

        info!(
            commits = commits.len(),
            branches = branches.len(),
            changed = files.len(),
            "Loaded repository snapshot"
        );

        Self {
            root: cwd.to_path_buf(),
            is_repo: true,
            commits,
            branches,
            status: aggregate(&files, cwd),
        }
    }

    pub fn current_branch(&self) -> Option<&Branch> {
        current_branch(&self.branches)
    }

    /// Lane layout for the loaded commits
    pub fn graph(&self) -> Vec<GraphRow> {
        build_graph(&self.commits)
    }
}
