//! Commit history queries
//!
//! Runs `git log` with a sentinel-delimited format and parses each record with
//! fixed field positions. Missing fields fall back to empty values instead of
//! failing the whole fetch.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use super::runner::CommandRunner;

/// Field separator placed between `--format` placeholders
pub const FIELD_SEPARATOR: &str = "<<SEP>>";

/// Default number of commits fetched
pub const DEFAULT_MAX_COUNT: i64 = 50;

/// Upper bound for a single history fetch
pub const MAX_COUNT_LIMIT: i64 = 1000;

/// Placeholders in record order: hash, short hash, subject, author, relative date, refs, parents
const FORMAT_FIELDS: [&str; 7] = ["%H", "%h", "%s", "%an", "%ar", "%D", "%P"];

/// A single commit from `git log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub subject: String,
    pub author: String,
    pub relative_date: String,
    /// Ref decorations in git's order (e.g. `HEAD -> main`, `tag: v1.0`)
    pub refs: Vec<String>,
    /// Parent hashes, first parent first
    pub parents: Vec<String>,
}

impl Commit {
    /// Create a commit with only identity and parents set
    pub fn new(hash: impl Into<String>, parents: &[&str]) -> Self {
        let hash = hash.into();
        Self {
            short_hash: hash.chars().take(7).collect(),
            hash,
            subject: String::new(),
            author: String::new(),
            relative_date: String::new(),
            refs: Vec::new(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// More than one parent
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// No parents
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Whether any decoration points HEAD at this commit
    pub fn is_head(&self) -> bool {
        self.refs.iter().any(|r| RefKind::of(r) == RefKind::Head)
    }
}

/// What a ref decoration names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Head,
    LocalBranch,
    RemoteBranch,
    Tag,
}

impl RefKind {
    /// Classify one `%D` entry
    pub fn of(decoration: &str) -> Self {
        if decoration == "HEAD" || decoration.starts_with("HEAD -> ") {
            RefKind::Head
        } else if decoration.starts_with("tag: ") {
            RefKind::Tag
        } else if is_remote_ref(decoration) {
            RefKind::RemoteBranch
        } else {
            RefKind::LocalBranch
        }
    }
}

fn is_remote_ref(decoration: &str) -> bool {
    const REMOTE_PREFIXES: [&str; 3] = ["origin/", "upstream/", "remotes/"];
    REMOTE_PREFIXES.iter().any(|p| decoration.starts_with(p))
}

/// Clamp a requested history length into `[1, MAX_COUNT_LIMIT]`
pub fn clamp_max_count(requested: i64) -> i64 {
    requested.clamp(1, MAX_COUNT_LIMIT)
}

/// The `--format=` argument value
fn log_format() -> String {
    FORMAT_FIELDS.join(FIELD_SEPARATOR)
}

/// Check whether `cwd` is inside a git work tree
#[instrument(skip(runner), fields(cwd = %cwd.display()))]
pub async fn is_repo<R: CommandRunner + ?Sized>(runner: &R, cwd: &Path) -> bool {
    match runner
        .run(cwd, &["rev-parse", "--is-inside-work-tree"])
        .await
    {
        Ok(_) => true,
        Err(e) => {
            debug!("not a repository: {}", e);
            false
        }
    }
}

/// Fetch up to `max_count` commits across all refs, newest first
///
/// Any failure yields an empty list, the same as a repository without commits.
#[instrument(skip(runner), fields(cwd = %cwd.display()))]
pub async fn get_commits<R: CommandRunner + ?Sized>(
    runner: &R,
    cwd: &Path,
    max_count: i64,
) -> Vec<Commit> {
    let format_arg = format!("--format={}", log_format());
    let max_arg = format!("--max-count={}", clamp_max_count(max_count));

    match runner
        .run(cwd, &["log", "--all", &format_arg, &max_arg])
        .await
    {
        Ok(raw) => parse_log(&raw),
        Err(e) => {
            debug!("log failed: {}", e);
            Vec::new()
        }
    }
}

/// Parse sentinel-delimited `git log` output, one record per line
pub fn parse_log(raw: &str) -> Vec<Commit> {
    raw.lines().filter_map(parse_record).collect()
}

fn parse_record(line: &str) -> Option<Commit> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let mut next = || fields.next().unwrap_or_default();

    let hash = next().trim();
    if hash.is_empty() {
        return None;
    }

    let short_hash = next();
    let subject = next();
    let author = next();
    let relative_date = next();
    let refs_raw = next();
    let parents_raw = next();

    Some(Commit {
        hash: hash.to_string(),
        short_hash: short_hash.to_string(),
        subject: subject.to_string(),
        author: author.to_string(),
        relative_date: relative_date.to_string(),
        refs: refs_raw
            .split(", ")
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect(),
        parents: parents_raw
            .split(' ')
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect(),
    })
}

/// Read a file's content as of `HEAD`
///
/// Returns `None` when `path` lies outside `cwd` or git cannot produce it.
#[instrument(skip(runner), fields(cwd = %cwd.display(), path = %path.display()))]
pub async fn file_at_head<R: CommandRunner + ?Sized>(
    runner: &R,
    cwd: &Path,
    path: &Path,
) -> Option<String> {
    let relative = if path.is_absolute() {
        path.strip_prefix(cwd).ok()?
    } else {
        path
    };
    if relative
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return None;
    }

    // Tree paths in revision specs always use '/'
    let spec = format!(
        "HEAD:{}",
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    );

    match runner.run(cwd, &["show", &spec]).await {
        Ok(content) => Some(content),
        Err(e) => {
            debug!("show failed: {}", e);
            None
        }
    }
}
