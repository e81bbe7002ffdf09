use std::path::PathBuf;

use serde::Serialize;

/// One `(filename, hexdigest)` line, mirroring [`suitcasectl_hash::HashEntry`]
/// but `Serialize`, for embedding in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct HashLine {
    pub filename: String,
    pub digest: String,
}

/// The final run-summary record emitted to standard output in the chosen
/// inventory format: destinations, suitcase names, source directories,
/// metadata files, hashes.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub destination: PathBuf,
    pub source_directories: Vec<PathBuf>,
    pub suitcase_names: Vec<String>,
    pub metadata_files: Vec<String>,
    pub inventory_fingerprint: String,
    pub bytes_transferred: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hashes: Vec<HashLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_indices: Vec<String>,
}
