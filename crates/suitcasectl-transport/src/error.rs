use std::fmt;
use std::path::PathBuf;

/// Errors raised by a [`crate::Transport`] implementation. Per-upload
/// errors are retried up to `retry_count`; exhaustion is logged but does
/// not delete local artifacts.
#[derive(Debug)]
pub enum TransportError {
    Io { path: PathBuf, source: std::io::Error },
    Http { reason: String },
    ShellExit { command: String, code: Option<i32> },
    RetriesExhausted { attempts: u32 },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Io { path, source } => {
                write!(f, "transport IO error for {}: {source}", path.display())
            }
            TransportError::Http { reason } => write!(f, "transport HTTP error: {reason}"),
            TransportError::ShellExit { command, code } => write!(
                f,
                "transport command `{command}` exited with {}",
                code.map(|c| c.to_string()).unwrap_or_else(|| "no status code".to_string())
            ),
            TransportError::RetriesExhausted { attempts } => {
                write!(f, "transport call failed after {attempts} attempt(s)")
            }
        }
    }
}

impl std::error::Error for TransportError {}
