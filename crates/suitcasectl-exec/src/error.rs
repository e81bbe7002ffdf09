use std::fmt;

/// Errors that abort the Executor's `run` call itself, as opposed to a
/// single suitcase index failing (those are carried per-outcome instead:
/// the executor records the error against that index and continues the
/// others).
#[derive(Debug)]
pub enum ExecError {
    Destination { source: std::io::Error },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Destination { source } => {
                write!(f, "failed to prepare destination directory: {source}")
            }
        }
    }
}

impl std::error::Error for ExecError {}
