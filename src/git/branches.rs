//! Local branch listing

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use super::runner::CommandRunner;

/// A local branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
}

/// List local branches; the checked-out one has `is_current` set
#[instrument(skip(runner), fields(cwd = %cwd.display()))]
pub async fn get_branches<R: CommandRunner + ?Sized>(runner: &R, cwd: &Path) -> Vec<Branch> {
    match runner.run(cwd, &["branch", "--no-color"]).await {
        Ok(raw) => parse_branches(&raw),
        Err(e) => {
            debug!("branch listing failed: {}", e);
            Vec::new()
        }
    }
}

/// Parse `git branch --no-color` output
pub fn parse_branches(raw: &str) -> Vec<Branch> {
    raw.lines()
        .filter_map(|line| {
            let (name, is_current) = if let Some(name) = line.strip_prefix("* ") {
                (name, true)
            } else if let Some(name) = line.strip_prefix("+ ") {
                // checked out in another worktree
                (name, false)
            } else {
                (line.trim_start(), false)
            };

            (!name.is_empty()).then(|| Branch {
                name: name.to_string(),
                is_current,
            })
        })
        .collect()
}

/// The current branch, if any
pub fn current_branch(branches: &[Branch]) -> Option<&Branch> {
    branches.iter().find(|b| b.is_current)
}
