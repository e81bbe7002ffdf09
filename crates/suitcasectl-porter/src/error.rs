use std::fmt;
use std::path::PathBuf;

/// Errors that abort the whole run. Per-suitcase failures surfaced by the
/// Executor are reported inside [`crate::RunSummary`] instead, since the
/// Porter decides fatal vs recoverable.
#[derive(Debug)]
pub enum PorterError {
    Destination { path: PathBuf, source: std::io::Error },
    Manifest(suitcasectl_manifest::ManifestError),
    Walk(suitcasectl_walk::WalkError),
    Pack(suitcasectl_pack::PackError),
    Writer(suitcasectl_writer::WriterError),
    Exec(suitcasectl_exec::ExecError),
    /// Every suitcase index failed; there is nothing to report as success.
    AllIndicesFailed { failures: Vec<(u32, String)> },
}

impl fmt::Display for PorterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PorterError::Destination { path, source } => {
                write!(f, "failed to prepare destination {}: {source}", path.display())
            }
            PorterError::Manifest(e) => write!(f, "{e}"),
            PorterError::Walk(e) => write!(f, "{e}"),
            PorterError::Pack(e) => write!(f, "{e}"),
            PorterError::Writer(e) => write!(f, "{e}"),
            PorterError::Exec(e) => write!(f, "{e}"),
            PorterError::AllIndicesFailed { failures } => {
                write!(f, "every suitcase index failed: ")?;
                for (i, (index, reason)) in failures.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "index {index}: {reason}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for PorterError {}

impl From<suitcasectl_manifest::ManifestError> for PorterError {
    fn from(e: suitcasectl_manifest::ManifestError) -> Self {
        PorterError::Manifest(e)
    }
}

impl From<suitcasectl_walk::WalkError> for PorterError {
    fn from(e: suitcasectl_walk::WalkError) -> Self {
        PorterError::Walk(e)
    }
}

impl From<suitcasectl_pack::PackError> for PorterError {
    fn from(e: suitcasectl_pack::PackError) -> Self {
        PorterError::Pack(e)
    }
}

impl From<suitcasectl_writer::WriterError> for PorterError {
    fn from(e: suitcasectl_writer::WriterError) -> Self {
        PorterError::Writer(e)
    }
}

impl From<suitcasectl_exec::ExecError> for PorterError {
    fn from(e: suitcasectl_exec::ExecError) -> Self {
        PorterError::Exec(e)
    }
}
