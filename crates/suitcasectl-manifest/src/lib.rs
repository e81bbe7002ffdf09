//! # suitcasectl-manifest
//!
//! The inventory data model, its (de)serialization, and the suitcase
//! naming scheme.
//!
//! ## What belongs here
//! * The `Inventory`/`FileRecord`/`OptionsSnapshot` shapes
//! * YAML/JSON (de)serialization of the inventory
//! * The `{prefix}-{user}-{nn}-of-{NN}.{format}` naming scheme
//!
//! ## What does NOT belong here
//! * Walking the filesystem (use `suitcasectl-walk`)
//! * Assigning files to suitcases (use `suitcasectl-pack`)
//! * Writing suitcase bytes to disk (use `suitcasectl-writer`)

mod error;
mod io;
mod naming;
mod types;

pub use error::ManifestError;
pub use io::{read_from, to_fingerprint_bytes, write_to, write_value_to};
pub use naming::{
    digest_bin_file_name, digest_text_file_name, inventory_file_name, suitcase_name,
    INVOCATION_META_FILE_NAME,
};
pub use types::{
    ArchiveTocMode, FileRecord, HashAlgorithm, IndexSummary, Inventory, InventoryFormat,
    InvocationMeta, OptionsSnapshot, SuitcaseFormat, TransportRef, SCHEMA_VERSION,
};
