use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Current on-disk inventory schema version.
///
/// Bump this when a field is removed or its meaning changes; new optional
/// fields do not require a bump.
pub const SCHEMA_VERSION: u32 = 1;

/// Suitcase container format tag. The tag is both the on-disk file suffix
/// and the key that selects the `suitcasectl-writer` layer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitcaseFormat {
    Tar,
    TarGz,
    TarGzGpg,
    TarGpg,
    TarZst,
    TarZstGpg,
}

impl SuitcaseFormat {
    /// The file suffix this tag expands to, e.g. `tar.gz.gpg`.
    pub fn suffix(self) -> &'static str {
        match self {
            SuitcaseFormat::Tar => "tar",
            SuitcaseFormat::TarGz => "tar.gz",
            SuitcaseFormat::TarGzGpg => "tar.gz.gpg",
            SuitcaseFormat::TarGpg => "tar.gpg",
            SuitcaseFormat::TarZst => "tar.zst",
            SuitcaseFormat::TarZstGpg => "tar.zst.gpg",
        }
    }

    pub fn from_suffix(s: &str) -> Option<Self> {
        Some(match s {
            "tar" => SuitcaseFormat::Tar,
            "tar.gz" => SuitcaseFormat::TarGz,
            "tar.gz.gpg" => SuitcaseFormat::TarGzGpg,
            "tar.gpg" => SuitcaseFormat::TarGpg,
            "tar.zst" => SuitcaseFormat::TarZst,
            "tar.zst.gpg" => SuitcaseFormat::TarZstGpg,
            _ => return None,
        })
    }

    pub fn is_encrypted(self) -> bool {
        matches!(
            self,
            SuitcaseFormat::TarGzGpg | SuitcaseFormat::TarGpg | SuitcaseFormat::TarZstGpg
        )
    }
}

impl Default for SuitcaseFormat {
    fn default() -> Self {
        SuitcaseFormat::TarZst
    }
}

/// The on-disk shape of the inventory file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryFormat {
    Yaml,
    Json,
}

impl InventoryFormat {
    pub fn extension(self) -> &'static str {
        match self {
            InventoryFormat::Yaml => "yaml",
            InventoryFormat::Json => "json",
        }
    }

    /// Resolve a format from a file's extension, for the inventory read path.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yaml" | "yml" => Some(InventoryFormat::Yaml),
            "json" => Some(InventoryFormat::Json),
            _ => None,
        }
    }
}

impl Default for InventoryFormat {
    fn default() -> Self {
        InventoryFormat::Yaml
    }
}

/// Content-hash algorithm tag. `None` disables hashing outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    None,
}

impl HashAlgorithm {
    /// Lowercase tag used in digest file names (`suitcasectl.<tag>`).
    pub fn tag(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::None => "none",
        }
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Md5
    }
}

/// Archive-table-of-contents inclusion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArchiveTocMode {
    /// Extract TOC only for recognized archive-shaped suffixes.
    pub shallow: bool,
    /// Extract TOC for every file, regardless of suffix.
    pub deep: bool,
}

impl ArchiveTocMode {
    pub fn enabled(self) -> bool {
        self.shallow || self.deep
    }
}

/// Opaque, serializable reference to a configured transport backend.
///
/// `suitcasectl-options` and `suitcasectl-transport` own the strongly typed
/// configuration; the manifest only needs enough to round-trip it and to
/// show it in the invocation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransportRef {
    /// `"null"`, `"shell"`, or `"cloud"`.
    pub kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

/// Frozen configuration snapshot carried alongside the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsSnapshot {
    pub directories: Vec<PathBuf>,
    pub user: String,
    pub prefix: String,
    pub max_suitcase_size: u64,
    pub internal_metadata_glob: String,
    #[serde(default)]
    pub external_metadata_files: Vec<PathBuf>,
    #[serde(default)]
    pub ignore_globs: Vec<String>,
    #[serde(default)]
    pub encrypt_inner: bool,
    #[serde(default)]
    pub hash_inner: bool,
    #[serde(default = "default_true")]
    pub hash_outer: bool,
    #[serde(default)]
    pub archive_toc: ArchiveTocMode,
    #[serde(default)]
    pub follow_symlinks: bool,
    pub suitcase_format: SuitcaseFormat,
    pub inventory_format: InventoryFormat,
    pub hash_algorithm: HashAlgorithm,
    #[serde(default)]
    pub limit_file_count: Option<usize>,
    #[serde(default)]
    pub transport: Option<TransportRef>,
}

fn default_true() -> bool {
    true
}

/// One file discovered during the walk, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute source path (the symlink target's path when followed).
    pub path: PathBuf,
    /// Source-root-relative destination, leading separator preserved.
    pub destination: String,
    pub base_name: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub archive_toc: Vec<String>,
    /// 1-based; `0` means not yet assigned by the Packer.
    #[serde(default)]
    pub suitcase_index: u32,
    #[serde(default)]
    pub suitcase_name: String,
}

impl FileRecord {
    pub fn is_assigned(&self) -> bool {
        self.suitcase_index > 0
    }
}

/// Per-suitcase-index rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IndexSummary {
    pub index: u32,
    pub file_count: usize,
    pub total_bytes: u64,
    pub human_bytes: String,
}

/// Timestamps, environment, and flag provenance for a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationMeta {
    pub start_time: String,
    pub end_time: String,
    pub version: String,
    pub hostname: String,
    pub user: String,
    #[serde(default)]
    pub explicit_flags: Vec<String>,
    #[serde(default)]
    pub default_flags: Vec<String>,
    #[serde(default)]
    pub merged_config: BTreeMap<String, String>,
}

/// The full manifest: every file record plus the options it was built
/// under and the per-index rollups the Packer produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub files: Vec<FileRecord>,
    pub options: OptionsSnapshot,
    pub total_indexes: u32,
    #[serde(default)]
    pub summaries: Vec<IndexSummary>,
    #[serde(default)]
    pub internal_metadata: BTreeMap<PathBuf, String>,
    #[serde(default)]
    pub external_metadata: BTreeMap<PathBuf, String>,
    #[serde(default)]
    pub invocation: Option<InvocationMeta>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Inventory {
    pub fn new(options: OptionsSnapshot) -> Self {
        Inventory {
            schema_version: SCHEMA_VERSION,
            files: Vec::new(),
            options,
            total_indexes: 0,
            summaries: Vec::new(),
            internal_metadata: BTreeMap::new(),
            external_metadata: BTreeMap::new(),
            invocation: None,
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.summaries.iter().map(|s| s.total_bytes).sum()
    }
}
