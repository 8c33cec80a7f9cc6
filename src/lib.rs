//! gitlane - Git history, branches and working-tree status with a lane graph
//!
//! This crate reads repository state through the `git` command-line tool and
//! turns it into display-ready structures: a commit list with a lane layout
//! for drawing a history graph, the branch list, and a working-tree status
//! map rolled up into directories.
//!
//! # Modules
//!
//! - [`git`] - Subprocess runner and the history, branch and status fetchers
//! - [`graph`] - Greedy lane assignment for the commit graph
//! - [`tui`] - Read-only terminal viewer built on ratatui
//! - [`config`] - Layered configuration
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod git;
pub mod graph;
pub mod tui;

pub use config::Config;
pub use error::{Error, Result};
pub use git::{Branch, Commit, FileStatus, GitRunner, RepoSnapshot};
pub use graph::{build_graph, GraphLine, GraphRow};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
