//! # suitcasectl-walk
//!
//! The Walker: directory traversal and metadata discovery.
//!
//! ## What belongs here
//! * Depth-first traversal producing one record per regular file
//! * Ignore-glob and symlink handling
//! * Internal/external metadata discovery
//!
//! ## What does NOT belong here
//! * Archive table-of-contents extraction (use `suitcasectl-archive-toc`)
//! * Bin-packing (use `suitcasectl-pack`)

mod error;
mod metadata;
mod text;
mod traverse;

pub use error::WalkError;
pub use text::looks_like_text;

use suitcasectl_manifest::{FileRecord, OptionsSnapshot};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything the Walker discovered for one run.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<FileRecord>,
    pub internal_metadata: BTreeMap<PathBuf, String>,
    pub external_metadata: BTreeMap<PathBuf, String>,
}

/// Walk every source root in `options`, honoring ignore globs, the
/// symlink policy, and `limit_file_count`.
pub fn walk(options: &OptionsSnapshot) -> Result<WalkOutcome, WalkError> {
    let mut internal_metadata = BTreeMap::new();
    for root in &options.directories {
        let found = metadata::gather_internal_metadata(root, &options.internal_metadata_glob)?;
        internal_metadata.extend(found);
    }
    let external_metadata = metadata::gather_external_metadata(&options.external_metadata_files)?;

    let ignore = traverse::build_ignore_set(&options.ignore_globs)?;
    let mut budget = traverse::new_budget(options.limit_file_count);
    let mut files = Vec::new();

    for root in &options.directories {
        traverse::walk_root(root, &ignore, options.follow_symlinks, &mut budget, &mut files);
        if budget.limit.is_some() && budget.seen >= budget.limit.unwrap() {
            tracing::debug!(limit = budget.limit, "limit-file-count reached, halting walk");
            break;
        }
    }

    Ok(WalkOutcome {
        files,
        internal_metadata,
        external_metadata,
    })
}
