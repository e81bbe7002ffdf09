use std::fmt;
use std::path::PathBuf;

/// Errors raised while assigning files to suitcase indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// A single file is larger than `max_suitcase_size`; no suitcase size
    /// could ever hold it, so the whole run fails.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackError::FileTooLarge { path, size, max_size } => write!(
                f,
                "file too large for suitcase: {} is {size} bytes but max-suitcase-size is {max_size} bytes",
                path.display()
            ),
        }
    }
}

impl std::error::Error for PackError {}
