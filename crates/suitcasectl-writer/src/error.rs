use std::fmt;
use std::path::PathBuf;

/// Errors raised while assembling or finishing a suitcase's WriterStack.
#[derive(Debug)]
pub enum WriterError {
    /// The suitcase file itself couldn't be created or written.
    Sink { path: PathBuf, source: std::io::Error },
    /// A compression or tar-framing layer failed mid-stream.
    Layer { path: PathBuf, source: std::io::Error },
    /// A public key file couldn't be read or didn't parse as an armored
    /// OpenPGP certificate.
    BadPublicKey { path: PathBuf, reason: String },
    /// Encryption was requested but no recipients were resolved.
    NoRecipients,
    /// The OpenPGP message couldn't be built or serialized.
    Encrypt { reason: String },
}

impl fmt::Display for WriterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriterError::Sink { path, source } => {
                write!(f, "failed to open suitcase sink {}: {source}", path.display())
            }
            WriterError::Layer { path, source } => {
                write!(f, "writer stack failure for {}: {source}", path.display())
            }
            WriterError::BadPublicKey { path, reason } => {
                write!(f, "invalid public key {}: {reason}", path.display())
            }
            WriterError::NoRecipients => {
                write!(f, "encryption requested but no recipient public keys were resolved")
            }
            WriterError::Encrypt { reason } => write!(f, "encryption failed: {reason}"),
        }
    }
}

impl std::error::Error for WriterError {}
