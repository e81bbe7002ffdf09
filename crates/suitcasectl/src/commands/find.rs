use anyhow::{Context, Result};
use suitcasectl_options::FindArgs;

/// `find`: search an existing inventory's file records by destination
/// substring.
pub(crate) fn handle(args: FindArgs) -> Result<()> {
    let inventory = suitcasectl_manifest::read_from(&args.inventory_file)
        .with_context(|| format!("reading inventory {}", args.inventory_file.display()))?;

    let mut matched = 0usize;
    for file in &inventory.files {
        if file.destination.contains(&args.query) {
            println!(
                "{}\t{} bytes\tsuitcase {:02}\t{}",
                file.destination, file.size, file.suitcase_index, file.suitcase_name
            );
            matched += 1;
        }
    }
    if matched == 0 {
        println!("no files matched {:?}", args.query);
    }
    Ok(())
}
