use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use suitcasectl_manifest::FileRecord;

use crate::error::WalkError;

/// Whether the caller-supplied file-count cap has been reached; traversal
/// stops cleanly rather than propagating this as a failure.
pub(crate) struct Budget {
    pub limit: Option<usize>,
    pub seen: usize,
}

impl Budget {
    fn reached(&self) -> bool {
        matches!(self.limit, Some(limit) if self.seen >= limit)
    }
}

pub(crate) fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, WalkError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| WalkError::BadGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| WalkError::BadGlob {
        pattern: patterns.join(","),
        source,
    })
}

/// Walk a single source root, appending discovered file records to `out`.
///
/// Directories are descended but never recorded. An entry whose base name
/// matches `ignore` is skipped outright (and, for a directory, its whole
/// subtree is never visited). Symlinks: skipped entirely when
/// `follow_symlinks` is false; otherwise resolved, with a link-to-directory
/// still skipped (the one hard rule that keeps this cycle-safe even while
/// "following" links) and a link-to-file using the target's size with the
/// *link's* relative path as `destination`.
pub(crate) fn walk_root(
    root: &Path,
    ignore: &GlobSet,
    follow_symlinks: bool,
    budget: &mut Budget,
    out: &mut Vec<FileRecord>,
) {
    visit(root, root, ignore, follow_symlinks, budget, out);
}

fn visit(
    dir: &Path,
    root: &Path,
    ignore: &GlobSet,
    follow_symlinks: bool,
    budget: &mut Budget,
    out: &mut Vec<FileRecord>,
) {
    if budget.reached() {
        return;
    }
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(path = %dir.display(), error = %err, "failed to read directory, skipping");
            return;
        }
    };

    for entry in entries {
        if budget.reached() {
            return;
        }
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(path = %dir.display(), error = %err, "failed to read directory entry, skipping");
                continue;
            }
        };
        let path = entry.path();
        let base_name = entry.file_name().to_string_lossy().into_owned();
        if ignore.is_match(&base_name) {
            continue;
        }

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to stat entry, skipping");
                continue;
            }
        };

        if file_type.is_symlink() {
            if !follow_symlinks {
                continue;
            }
            let target_meta = match std::fs::metadata(&path) {
                Ok(m) => m,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "unresolvable symlink, skipping");
                    continue;
                }
            };
            if target_meta.is_dir() {
                // Never followed, even in follow-symlinks mode: this is
                // the rule that prevents cycles through absolute links
                // back up the tree.
                continue;
            }
            let destination = relative_destination(root, &path);
            record_file(&path, destination, target_meta.len(), budget, out);
            continue;
        }

        if file_type.is_dir() {
            visit(&path, root, ignore, follow_symlinks, budget, out);
        } else if file_type.is_file() {
            let meta = match entry.metadata() {
                Ok(m) => m,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to stat file, skipping");
                    continue;
                }
            };
            let destination = relative_destination(root, &path);
            record_file(&path, destination, meta.len(), budget, out);
        }
    }
}

fn relative_destination(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut s = rel.to_string_lossy().replace('\\', "/");
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    s
}

fn record_file(
    path: &Path,
    destination: String,
    size: u64,
    budget: &mut Budget,
    out: &mut Vec<FileRecord>,
) {
    let base_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    out.push(FileRecord {
        path: path.to_path_buf(),
        destination,
        base_name,
        size,
        archive_toc: Vec::new(),
        suitcase_index: 0,
        suitcase_name: String::new(),
    });
    budget.seen += 1;
}

pub(crate) fn new_budget(limit: Option<usize>) -> Budget {
    Budget { limit, seen: 0 }
}
