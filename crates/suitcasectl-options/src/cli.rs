//! The `clap` CLI surface. Flag *plumbing* (completions, JSON-schema
//! emission, the interactive wizard) is intentionally absent — those are
//! non-goals.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "suitcasectl", version, about = "Pack directory trees into numbered archive suitcases.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create something: a suitcase set, or an encryption keypair.
    Create {
        #[command(subcommand)]
        target: CreateTarget,
    },
    /// Inspect an existing inventory without building or packing anything.
    Analyze(InventoryArgs),
    /// Search an existing inventory's file records by destination/name.
    Find(FindArgs),
    /// Print an existing inventory as a directory tree.
    Tree(InventoryArgs),
}

#[derive(Subcommand, Debug)]
pub enum CreateTarget {
    /// Walk, pack, and write a numbered suitcase set (the main entry point).
    Suitcase(SuitcaseArgs),
    /// Generate an OpenPGP keypair for use with `--public-key`/encryption.
    Keys(KeysArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SuitcaseArgs {
    /// Source root directories to pack. Omit when `--inventory-file` is given.
    pub directories: Vec<PathBuf>,

    /// Output directory for suitcases and metadata files. Defaults to a
    /// fresh temp directory.
    #[arg(long)]
    pub destination: Option<PathBuf>,

    /// Use an already-built inventory instead of walking `directories`.
    #[arg(long, conflicts_with = "directories")]
    pub inventory_file: Option<PathBuf>,

    /// Build and write the inventory, then stop without packing.
    #[arg(long)]
    pub only_inventory: bool,

    #[arg(long, value_name = "FORMAT")]
    pub inventory_format: Option<String>,

    #[arg(long, value_name = "FORMAT")]
    pub suitcase_format: Option<String>,

    #[arg(long, value_name = "ALGO")]
    pub hash_algorithm: Option<String>,

    #[arg(long)]
    pub hash_inner: bool,

    #[arg(long)]
    pub hash_outer: bool,

    #[arg(long)]
    pub encrypt_inner: bool,

    /// Armored public key file. Repeatable.
    #[arg(long = "public-key", value_name = "PATH")]
    pub public_keys: Vec<PathBuf>,

    /// Human-readable size, e.g. `500MiB`, `2.5Gi`. `0` disables the cap.
    #[arg(long, value_name = "SIZE")]
    pub max_suitcase_size: Option<String>,

    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    #[arg(long, value_name = "N")]
    pub retry_count: Option<u32>,

    /// Seconds between transport upload retries.
    #[arg(long, value_name = "SECONDS")]
    pub retry_interval: Option<u64>,

    #[arg(long)]
    pub follow_symlinks: bool,

    /// Glob for base names to skip. Repeatable.
    #[arg(long = "ignore-glob", value_name = "GLOB")]
    pub ignore_globs: Vec<String>,

    #[arg(long, value_name = "GLOB")]
    pub internal_metadata_glob: Option<String>,

    /// Explicitly named external metadata file. Repeatable.
    #[arg(long = "external-metadata-file", value_name = "PATH")]
    pub external_metadata_files: Vec<PathBuf>,

    /// Stop the walk after this many files (debugging aid).
    #[arg(long, value_name = "N")]
    pub limit_file_count: Option<usize>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub prefix: Option<String>,

    /// Extract a shallow table of contents for archive-shaped files.
    #[arg(long)]
    pub archive_toc: bool,

    /// Extract a table of contents for every file, regardless of suffix.
    #[arg(long)]
    pub archive_toc_deep: bool,
}

#[derive(Args, Debug, Clone)]
pub struct KeysArgs {
    /// Name embedded in the generated key's user ID.
    #[arg(long, default_value = "suitcasectl")]
    pub name: String,
    /// Email embedded in the generated key's user ID.
    #[arg(long)]
    pub email: Option<String>,
    /// Directory to write `<name>.pub.asc` / `<name>.sec.asc` into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    /// Path to an inventory file (`.yaml`/`.yml`/`.json`).
    pub inventory_file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct FindArgs {
    /// Path to an inventory file.
    pub inventory_file: PathBuf,
    /// Substring to match against each file's destination path.
    pub query: String,
}
