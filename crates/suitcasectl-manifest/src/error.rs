use std::fmt;
use std::path::PathBuf;

/// Errors raised while building, reading, or writing an inventory.
#[derive(Debug)]
pub enum ManifestError {
    /// The inventory file's extension doesn't map to a known format.
    UnknownExtension { path: PathBuf },
    /// Reading the inventory file from disk failed.
    Io { path: PathBuf, source: std::io::Error },
    /// The file's extension claims one format but the bytes are another shape.
    Decode { path: PathBuf, source: anyhow::Error },
    /// Serializing the inventory failed.
    Encode { source: anyhow::Error },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::UnknownExtension { path } => {
                write!(f, "unknown inventory extension: {}", path.display())
            }
            ManifestError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ManifestError::Decode { path, source } => {
                write!(f, "failed to decode inventory at {}: {source}", path.display())
            }
            ManifestError::Encode { source } => write!(f, "failed to encode inventory: {source}"),
        }
    }
}

impl std::error::Error for ManifestError {}
