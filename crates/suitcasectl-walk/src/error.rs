use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum WalkError {
    /// A metadata-glob match or an `--external-metadata-file` entry wasn't text.
    NotText { path: PathBuf },
    /// One of the configured ignore globs failed to compile.
    BadGlob { pattern: String, source: globset::Error },
    /// A source root itself couldn't be read.
    Root { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkError::NotText { path } => write!(f, "not a text file: {}", path.display()),
            WalkError::BadGlob { pattern, source } => {
                write!(f, "invalid ignore glob {pattern:?}: {source}")
            }
            WalkError::Root { path, source } => {
                write!(f, "cannot read source root {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for WalkError {}
