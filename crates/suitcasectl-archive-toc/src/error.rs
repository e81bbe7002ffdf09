use std::fmt;
use std::path::PathBuf;

/// Errors raised while extracting an archive's table of contents.
#[derive(Debug)]
pub enum TocError {
    /// The file isn't a recognized archive shape (including the
    /// self-referential single `"."` entry case).
    NotAnArchive { path: PathBuf },
    /// More than 100,000 entries were encountered before the archive was
    /// fully read.
    TooManyEntries { path: PathBuf, limit: usize },
    /// The archive's bytes couldn't be read or decoded.
    Read { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for TocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TocError::NotAnArchive { path } => {
                write!(f, "not an archive: {}", path.display())
            }
            TocError::TooManyEntries { path, limit } => write!(
                f,
                "archive {} has more than {limit} entries",
                path.display()
            ),
            TocError::Read { path, source } => {
                write!(f, "failed to read archive {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for TocError {}
