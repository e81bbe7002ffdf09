use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use globset::Glob;

use crate::error::WalkError;
use crate::text::looks_like_text;

/// Glob every file under `root` against `pattern` and collect the ones
/// that look like text, keyed by absolute path.
pub fn gather_internal_metadata(
    root: &Path,
    pattern: &str,
) -> Result<BTreeMap<PathBuf, String>, WalkError> {
    let matcher = Glob::new(pattern)
        .map_err(|source| WalkError::BadGlob {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let mut out = BTreeMap::new();
    visit_files(root, &mut |abs, rel| {
        if matcher.is_match(rel) {
            if looks_like_text(abs).unwrap_or(false) {
                if let Ok(content) = std::fs::read_to_string(abs) {
                    out.insert(abs.to_path_buf(), content);
                }
            } else {
                return Err(WalkError::NotText { path: abs.to_path_buf() });
            }
        }
        Ok(())
    })?;
    Ok(out)
}

/// Read each explicitly named external metadata file.
pub fn gather_external_metadata(
    files: &[PathBuf],
) -> Result<BTreeMap<PathBuf, String>, WalkError> {
    let mut out = BTreeMap::new();
    for path in files {
        if !looks_like_text(path).unwrap_or(false) {
            return Err(WalkError::NotText { path: path.clone() });
        }
        let content = std::fs::read_to_string(path).map_err(|source| WalkError::Root {
            path: path.clone(),
            source,
        })?;
        out.insert(path.clone(), content);
    }
    Ok(out)
}

/// Depth-first visit of every regular file under `root`, calling `f` with
/// the absolute path and the root-relative path (forward-slash string).
/// Errors from `f` abort the visit; I/O errors reading a subdirectory are
/// silently skipped (metadata discovery is best-effort over whatever the
/// walk will separately surface).
fn visit_files(
    root: &Path,
    f: &mut dyn FnMut(&Path, &str) -> Result<(), WalkError>,
) -> Result<(), WalkError> {
    fn recurse(
        dir: &Path,
        root: &Path,
        f: &mut dyn FnMut(&Path, &str) -> Result<(), WalkError>,
    ) -> Result<(), WalkError> {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(_) => return Ok(()),
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(_) => continue,
            };
            if file_type.is_dir() {
                recurse(&path, root, f)?;
            } else if file_type.is_file() {
                let rel = path.strip_prefix(root).unwrap_or(&path).to_string_lossy().replace('\\', "/");
                f(&path, &rel)?;
            }
        }
        Ok(())
    }
    recurse(root, root, f)
}
