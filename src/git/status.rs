//! Working-tree status from `git status --porcelain`
//!
//! Each porcelain line carries two status columns (X = index, Y = work tree)
//! followed by a path. The pair is folded into a single [`FileStatus`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument};

use super::aggregate::aggregate;
use super::runner::CommandRunner;

/// Per-path status, ordered by severity (`Untracked` lowest, `Conflict` highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Untracked,
    Added,
    Renamed,
    Modified,
    Deleted,
    Conflict,
}

impl FileStatus {
    /// All statuses, least severe first
    pub const ALL: [FileStatus; 6] = [
        FileStatus::Untracked,
        FileStatus::Added,
        FileStatus::Renamed,
        FileStatus::Modified,
        FileStatus::Deleted,
        FileStatus::Conflict,
    ];

    /// Position in the severity order
    pub fn severity(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Untracked => "untracked",
            FileStatus::Added => "added",
            FileStatus::Renamed => "renamed",
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::Conflict => "conflict",
        }
    }

    /// One-letter marker for compact listings
    pub fn letter(self) -> char {
        match self {
            FileStatus::Untracked => '?',
            FileStatus::Added => 'A',
            FileStatus::Renamed => 'R',
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::Conflict => '!',
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fold the two porcelain status columns into one status.
///
/// Rules are checked in order; the first match wins. Conflict detection must
/// run before the single-column checks so that `AA` and `DD` are conflicts.
pub fn classify(x: char, y: char) -> FileStatus {
    if x == '?' && y == '?' {
        FileStatus::Untracked
    } else if x == 'U' || y == 'U' || (x == 'D' && y == 'D') || (x == 'A' && y == 'A') {
        FileStatus::Conflict
    } else if x == 'D' || y == 'D' {
        FileStatus::Deleted
    } else if x == 'R' || y == 'R' {
        FileStatus::Renamed
    } else if x == 'A' {
        FileStatus::Added
    } else {
        FileStatus::Modified
    }
}

/// Parse porcelain v1 output into `(relative path, status)` pairs.
///
/// For renames (`old -> new`) the new path is kept. Lines shorter than
/// four characters are skipped.
pub fn parse_porcelain(raw: &str) -> Vec<(String, FileStatus)> {
    raw.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<(String, FileStatus)> {
    let mut chars = line.chars();
    let x = chars.next()?;
    let y = chars.next()?;
    chars.next()?;

    let rest = chars.as_str();
    if rest.is_empty() {
        return None;
    }

    let path = rest.rsplit(" -> ").next().unwrap_or(rest);
    Some((path.to_string(), classify(x, y)))
}

/// Per-file status keyed by absolute path (`cwd` joined with the porcelain path)
#[instrument(skip(runner), fields(cwd = %cwd.display()))]
pub async fn get_status<R: CommandRunner + ?Sized>(
    runner: &R,
    cwd: &Path,
) -> BTreeMap<PathBuf, FileStatus> {
    match runner.run(cwd, &["status", "--porcelain"]).await {
        Ok(raw) => parse_porcelain(&raw)
            .into_iter()
            .map(|(path, status)| (cwd.join(path), status))
            .collect(),
        Err(e) => {
            debug!("status failed: {}", e);
            BTreeMap::new()
        }
    }
}

/// Per-file status plus every directory between each file and `cwd`
pub async fn get_status_tree<R: CommandRunner + ?Sized>(
    runner: &R,
    cwd: &Path,
) -> BTreeMap<PathBuf, FileStatus> {
    let files = get_status(runner, cwd).await;
    aggregate(&files, cwd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::FakeRunner;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify('?', '?'), FileStatus::Untracked);
        assert_eq!(classify('A', 'A'), FileStatus::Conflict);
        assert_eq!(classify('D', 'D'), FileStatus::Conflict);
        assert_eq!(classify('U', 'D'), FileStatus::Conflict);
        assert_eq!(classify('A', 'U'), FileStatus::Conflict);
        assert_eq!(classify('D', ' '), FileStatus::Deleted);
        assert_eq!(classify(' ', 'D'), FileStatus::Deleted);
        assert_eq!(classify('R', 'D'), FileStatus::Deleted);
        assert_eq!(classify('R', ' '), FileStatus::Renamed);
        assert_eq!(classify('R', 'M'), FileStatus::Renamed);
        assert_eq!(classify('A', ' '), FileStatus::Added);
        assert_eq!(classify('A', 'M'), FileStatus::Added);
        assert_eq!(classify('M', ' '), FileStatus::Modified);
        assert_eq!(classify(' ', 'M'), FileStatus::Modified);
        assert_eq!(classify(' ', 'A'), FileStatus::Modified);
    }

    #[test]
    fn test_severity_order() {
        let severities: Vec<u8> = FileStatus::ALL.iter().map(|s| s.severity()).collect();
        assert_eq!(severities, vec![0, 1, 2, 3, 4, 5]);
        assert!(FileStatus::Conflict > FileStatus::Deleted);
        assert!(FileStatus::Modified > FileStatus::Untracked);
    }

    #[test]
    fn test_parse_porcelain() {
        let raw = " M src/lib.rs\nM  src/a.ts\n?? notes.txt\nR  old.rs -> new/place.rs\nAA both.rs\nx\n";
        let parsed = parse_porcelain(raw);

        assert_eq!(
            parsed,
            vec![
                ("src/lib.rs".to_string(), FileStatus::Modified),
                ("src/a.ts".to_string(), FileStatus::Modified),
                ("notes.txt".to_string(), FileStatus::Untracked),
                ("new/place.rs".to_string(), FileStatus::Renamed),
                ("both.rs".to_string(), FileStatus::Conflict),
            ]
        );
    }

    #[test]
    fn test_parse_porcelain_non_ascii_path() {
        let parsed = parse_porcelain("?? docs/résumé.md");
        assert_eq!(parsed, vec![("docs/résumé.md".to_string(), FileStatus::Untracked)]);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&FileStatus::Conflict).unwrap();
        assert_eq!(json, "\"conflict\"");
        assert_eq!(FileStatus::Renamed.to_string(), "renamed");
    }

    #[tokio::test]
    async fn test_get_status_joins_cwd() {
        let runner = FakeRunner::new().respond("status", " M src/a.ts\n?? b.ts");
        let status = get_status(&runner, Path::new("/repo")).await;

        assert_eq!(status.len(), 2);
        assert_eq!(status[Path::new("/repo/src/a.ts")], FileStatus::Modified);
        assert_eq!(status[Path::new("/repo/b.ts")], FileStatus::Untracked);
        assert_eq!(runner.calls()[0], vec!["status", "--porcelain"]);
    }

    #[tokio::test]
    async fn test_get_status_failure_is_empty() {
        let runner = FakeRunner::new();
        assert!(get_status(&runner, Path::new("/repo")).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_status_tree() {
        let runner = FakeRunner::new().respond("status", "M  src/a.ts\n?? src/b.ts");
        let tree = get_status_tree(&runner, Path::new("/repo")).await;

        assert_eq!(tree[Path::new("/repo/src")], FileStatus::Modified);
        assert!(!tree.contains_key(Path::new("/repo")));
    }
}
