use suitcasectl_manifest::{HashAlgorithm, InventoryFormat, SuitcaseFormat};
use std::time::Duration;

/// Compile-time defaults, layer 1 of the three-layer configuration merge.
pub struct Defaults;

impl Defaults {
    pub const SUITCASE_FORMAT: SuitcaseFormat = SuitcaseFormat::TarZst;
    pub const INVENTORY_FORMAT: InventoryFormat = InventoryFormat::Yaml;
    pub const HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Md5;
    pub const CONCURRENCY: usize = 10;
    pub const MAX_SUITCASE_SIZE: u64 = 500 * 1024 * 1024 * 1024;
    pub const RETRY_COUNT: u32 = 5;
    pub const RETRY_INTERVAL: Duration = Duration::from_secs(1);
    pub const PREFIX: &'static str = "suitcase";
    pub const INTERNAL_METADATA_GLOB: &'static str = "*.suitcase-meta";
}
