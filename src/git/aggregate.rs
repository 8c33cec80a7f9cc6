//! Roll file statuses up to their directories
//!
//! A directory takes the most severe status of anything beneath it, so a
//! file browser can decorate folders without walking the filesystem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::status::FileStatus;

/// Extend `files` with an entry for every ancestor directory inside `repo_root`.
///
/// Walks from each file's parent upward, stopping at `repo_root` itself or at
/// the first ancestor outside it. When several files share a directory, the
/// higher-severity status wins; on a tie the existing value is kept.
pub fn aggregate(
    files: &BTreeMap<PathBuf, FileStatus>,
    repo_root: &Path,
) -> BTreeMap<PathBuf, FileStatus> {
    let mut tree = files.clone();

    for (path, &status) in files {
        for dir in path.ancestors().skip(1) {
            if dir == repo_root || !dir.starts_with(repo_root) {
                break;
            }
            tree.entry(dir.to_path_buf())
                .and_modify(|existing| {
                    if status > *existing {
                        *existing = status;
                    }
                })
                .or_insert(status);
        }
    }

    tree
}
