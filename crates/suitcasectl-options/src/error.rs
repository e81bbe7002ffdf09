use std::fmt;
use std::path::PathBuf;

/// Configuration errors raised while merging defaults, the `suitcasectl.*`
/// file, and explicit flags into a resolved run.
#[derive(Debug)]
pub enum OptionsError {
    /// A `--max-suitcase-size`-shaped value didn't parse as a byte count.
    BadSize { value: String, reason: String },
    /// `--prefix` contained a path separator.
    ForbiddenPrefixChar { prefix: String },
    /// The same source root was named more than once.
    DuplicateSourceRoot { path: PathBuf },
    /// Both `--inventory-file` and source roots were supplied.
    InventoryFileAndSourceRoots,
    /// Neither `--inventory-file` nor any source root was supplied.
    NoSourceRootsOrInventoryFile,
    /// `--only-inventory` doesn't make sense alongside a pre-existing
    /// `--inventory-file` — there is nothing left to do.
    OnlyInventoryWithInventoryFile,
    /// `suitcasectl.*` file found but failed to parse as TOML.
    ConfigFile { path: PathBuf, source: toml::de::Error },
    /// `suitcasectl.*` file found but failed to read from disk.
    ConfigFileIo { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::BadSize { value, reason } => {
                write!(f, "invalid size {value:?}: {reason}")
            }
            OptionsError::ForbiddenPrefixChar { prefix } => {
                write!(f, "--prefix {prefix:?} may not contain a path separator")
            }
            OptionsError::DuplicateSourceRoot { path } => {
                write!(f, "duplicate source root: {}", path.display())
            }
            OptionsError::InventoryFileAndSourceRoots => write!(
                f,
                "--inventory-file and source roots are mutually exclusive"
            ),
            OptionsError::NoSourceRootsOrInventoryFile => write!(
                f,
                "either source roots or --inventory-file must be supplied"
            ),
            OptionsError::OnlyInventoryWithInventoryFile => write!(
                f,
                "--only-inventory has no effect when --inventory-file already supplies one"
            ),
            OptionsError::ConfigFile { path, source } => {
                write!(f, "invalid config file {}: {source}", path.display())
            }
            OptionsError::ConfigFileIo { path, source } => {
                write!(f, "cannot read config file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for OptionsError {}
