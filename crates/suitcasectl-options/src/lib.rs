//! # suitcasectl-options
//!
//! The layered configuration merge: compiled defaults, overridden by a
//! `suitcasectl.*` file found in a source root, overridden by explicit
//! CLI flags.
//!
//! ## What belongs here
//! * The `clap` CLI surface
//! * Compiled defaults
//! * `suitcasectl.*` config-file parsing
//! * Merging the three layers into an `OptionsSnapshot` plus run-only
//!   knobs (destination, concurrency, retries)
//!
//! ## What does NOT belong here
//! * The inventory data model itself (use `suitcasectl-manifest`)
//! * Anything that walks the filesystem or packs files

mod cli;
mod config_file;
mod defaults;
mod error;
mod resolve;

pub use cli::{Cli, Command, CreateTarget, FindArgs, InventoryArgs, KeysArgs, SuitcaseArgs};
pub use config_file::ConfigFile;
pub use defaults::Defaults;
pub use error::OptionsError;
pub use resolve::{resolve, ResolvedOptions};
