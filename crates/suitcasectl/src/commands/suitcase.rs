use std::sync::Arc;

use anyhow::Result;
use suitcasectl_options::SuitcaseArgs;
use suitcasectl_porter::Porter;
use suitcasectl_transport::{NullTransport, Transport};

/// The main entry point: `create suitcase`. Walks (or loads) an
/// inventory, packs it, and writes the numbered suitcase set.
pub(crate) async fn handle(args: SuitcaseArgs) -> Result<()> {
    let (explicit_flags, default_flags) = flag_provenance(&args);
    let resolved = suitcasectl_options::resolve(args)?;

    // No `--transport-*` flags are exposed on the CLI surface; the default
    // transport is the no-op `NullTransport`, which still drives the full
    // pending/in-progress/complete status lifecycle.
    let transport: Arc<dyn Transport> = Arc::new(NullTransport);
    let porter = Porter::new(Some(transport));

    porter.run(&resolved, &explicit_flags, &default_flags).await?;
    Ok(())
}

/// Bucket each flag into "explicitly set" or "left at its compiled
/// default", for the invocation record.
fn flag_provenance(args: &SuitcaseArgs) -> (Vec<String>, Vec<String>) {
    let mut explicit = Vec::new();
    let mut default = Vec::new();

    macro_rules! bucket {
        ($name:literal, $present:expr) => {
            if $present {
                explicit.push($name.to_string());
            } else {
                default.push($name.to_string());
            }
        };
    }

    bucket!("destination", args.destination.is_some());
    bucket!("inventory_file", args.inventory_file.is_some());
    bucket!("only_inventory", args.only_inventory);
    bucket!("inventory_format", args.inventory_format.is_some());
    bucket!("suitcase_format", args.suitcase_format.is_some());
    bucket!("hash_algorithm", args.hash_algorithm.is_some());
    bucket!("hash_inner", args.hash_inner);
    bucket!("hash_outer", args.hash_outer);
    bucket!("encrypt_inner", args.encrypt_inner);
    bucket!("public_key", !args.public_keys.is_empty());
    bucket!("max_suitcase_size", args.max_suitcase_size.is_some());
    bucket!("concurrency", args.concurrency.is_some());
    bucket!("retry_count", args.retry_count.is_some());
    bucket!("retry_interval", args.retry_interval.is_some());
    bucket!("follow_symlinks", args.follow_symlinks);
    bucket!("ignore_glob", !args.ignore_globs.is_empty());
    bucket!("internal_metadata_glob", args.internal_metadata_glob.is_some());
    bucket!("external_metadata_file", !args.external_metadata_files.is_empty());
    bucket!("limit_file_count", args.limit_file_count.is_some());
    bucket!("user", args.user.is_some());
    bucket!("prefix", args.prefix.is_some());
    bucket!("archive_toc", args.archive_toc);
    bucket!("archive_toc_deep", args.archive_toc_deep);

    (explicit, default)
}
