use suitcasectl_archive_toc::{extract_toc, SHALLOW_SUFFIXES};
use suitcasectl_manifest::{ArchiveTocMode, FileRecord};

/// Attach each file's archive table of contents. Invoked only when
/// include-archive-toc is set (archive-shaped files only) or
/// include-archive-toc-deep is set (every file). Parse failures are
/// logged per file, leaving `archive_toc` empty.
pub fn attach_archive_tocs(files: &mut [FileRecord], mode: ArchiveTocMode) {
    if !mode.enabled() {
        return;
    }
    for file in files.iter_mut() {
        if !mode.deep && !has_shallow_suffix(&file.base_name) {
            continue;
        }
        match extract_toc(&file.path, mode.deep) {
            Ok(toc) => file.archive_toc = toc,
            Err(err) => {
                tracing::warn!(path = %file.path.display(), %err, "archive TOC extraction failed");
            }
        }
    }
}

fn has_shallow_suffix(base_name: &str) -> bool {
    let lower = base_name.to_lowercase();
    SHALLOW_SUFFIXES.iter().any(|suffix| lower.ends_with(&format!(".{suffix}")))
}
