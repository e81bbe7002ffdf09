//! Layer 2 of the configuration merge: a per-source-root `suitcasectl.*`
//! override file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::OptionsError;

/// Every field optional: only what's present overrides the compiled
/// defaults (layer 1); anything still unset falls through to explicit
/// flags (layer 3).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    pub user: Option<String>,
    pub prefix: Option<String>,
    pub max_suitcase_size: Option<String>,
    pub suitcase_format: Option<String>,
    pub inventory_format: Option<String>,
    pub hash_algorithm: Option<String>,
    pub hash_inner: Option<bool>,
    pub hash_outer: Option<bool>,
    pub encrypt_inner: Option<bool>,
    pub follow_symlinks: Option<bool>,
    pub internal_metadata_glob: Option<String>,
    #[serde(default)]
    pub ignore_glob: Vec<String>,
    #[serde(default)]
    pub external_metadata_file: Vec<PathBuf>,
    pub concurrency: Option<usize>,
    pub retry_count: Option<u32>,
    pub retry_interval_secs: Option<u64>,
}

/// Find the first `suitcasectl.*` file in any of `roots`, in root order,
/// and parse it as TOML. A root with no such file is skipped; the first
/// match wins.
pub fn discover(roots: &[PathBuf]) -> Result<Option<ConfigFile>, OptionsError> {
    for root in roots {
        if let Some(path) = find_in(root) {
            let text = std::fs::read_to_string(&path)
                .map_err(|source| OptionsError::ConfigFileIo { path: path.clone(), source })?;
            let parsed = toml::from_str(&text)
                .map_err(|source| OptionsError::ConfigFile { path: path.clone(), source })?;
            tracing::debug!(path = %path.display(), "using suitcasectl config override file");
            return Ok(Some(parsed));
        }
    }
    Ok(None)
}

fn find_in(root: &Path) -> Option<PathBuf> {
    let pattern = root.join("suitcasectl.*");
    let pattern = pattern.to_string_lossy().into_owned();
    glob::glob(&pattern)
        .ok()?
        .filter_map(Result::ok)
        .find(|p| p.is_file())
}
