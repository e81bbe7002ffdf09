use anyhow::{Context, Result};
use suitcasectl_options::InventoryArgs;

/// `analyze`: summarize an existing inventory without building or
/// packing anything.
pub(crate) fn handle(args: InventoryArgs) -> Result<()> {
    let inventory = suitcasectl_manifest::read_from(&args.inventory_file)
        .with_context(|| format!("reading inventory {}", args.inventory_file.display()))?;

    println!("source directories:");
    for dir in &inventory.options.directories {
        println!("  {}", dir.display());
    }
    println!("files: {}", inventory.files.len());
    println!("suitcases: {}", inventory.total_indexes);
    println!("total bytes: {}", inventory.total_bytes());
    for summary in &inventory.summaries {
        println!(
            "  index {:02}: {} files, {} ({} bytes)",
            summary.index, summary.file_count, summary.human_bytes, summary.total_bytes
        );
    }
    if !inventory.internal_metadata.is_empty() {
        println!("internal metadata files: {}", inventory.internal_metadata.len());
    }
    if !inventory.external_metadata.is_empty() {
        println!("external metadata files: {}", inventory.external_metadata.len());
    }
    if let Some(invocation) = &inventory.invocation {
        println!("built by {} on {} at {}", invocation.user, invocation.hostname, invocation.start_time);
    }
    Ok(())
}
