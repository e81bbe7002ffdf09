use crate::types::SuitcaseFormat;

/// `{prefix}-{user}-{nn}-of-{NN}.{format}`.
///
/// `index` and `total` are both rendered as zero-padded two-digit decimals;
/// callers with more than 99 suitcases still get a name (the field simply
/// widens) rather than an upper bound on suitcase count.
pub fn suitcase_name(prefix: &str, user: &str, index: u32, total: u32, format: SuitcaseFormat) -> String {
    format!(
        "{prefix}-{user}-{index:02}-of-{total:02}.{suffix}",
        suffix = format.suffix()
    )
}

/// `inventory.{format}`.
pub fn inventory_file_name(ext: &str) -> String {
    format!("inventory.{ext}")
}

/// `suitcasectl-invocation-meta.yaml`.
pub const INVOCATION_META_FILE_NAME: &str = "suitcasectl-invocation-meta.yaml";

/// Text digest file name: `suitcasectl.<algo>`.
pub fn digest_text_file_name(algo_tag: &str) -> String {
    format!("suitcasectl.{algo_tag}")
}

/// Binary-form (checksum-tool-compatible) digest file name: `suitcasectl.<algo>bin`.
pub fn digest_bin_file_name(algo_tag: &str) -> String {
    format!("suitcasectl.{algo_tag}bin")
}
