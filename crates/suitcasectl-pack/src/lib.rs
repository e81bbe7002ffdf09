//! # suitcasectl-pack
//!
//! The Packer: a pure function over an already-populated inventory that
//! assigns every file record to a 1-based suitcase index under a
//! `max_suitcase_size` cap.
//!
//! ## What belongs here
//! * The bin-packing algorithm and its invariants
//! * Per-index summary computation
//!
//! ## What does NOT belong here
//! * Walking the filesystem (use `suitcasectl-walk`)
//! * Writing suitcase bytes (use `suitcasectl-writer`)

mod error;

pub use error::PackError;

use bytesize::ByteSize;
use suitcasectl_manifest::{suitcase_name, FileRecord, IndexSummary, Inventory};

/// One bin's remaining capacity, kept in creation order.
///
/// First-fit over a hash map is non-deterministic across runs; an ordered
/// sequence of remaining capacities indexed by creation order keeps the
/// layout reproducible for a fixed input order without changing the
/// capacity guarantee.
struct Bin {
    remaining: u64,
}

/// Assign every file in `inventory.files` to a suitcase index, in place.
///
/// Mutates `files[*].suitcase_index`/`suitcase_name`, `total_indexes`, and
/// `summaries`. Leaves the inventory untouched on error.
pub fn pack(inventory: &mut Inventory) -> Result<(), PackError> {
    let max_size = inventory.options.max_suitcase_size;
    let prefix = inventory.options.prefix.clone();
    let user = inventory.options.user.clone();
    let format = inventory.options.suitcase_format;

    if max_size == 0 {
        for file in &mut inventory.files {
            file.suitcase_index = 1;
        }
        let total_bytes: u64 = inventory.files.iter().map(|f| f.size).sum();
        inventory.total_indexes = if inventory.files.is_empty() { 0 } else { 1 };
        inventory.summaries = if inventory.files.is_empty() {
            Vec::new()
        } else {
            vec![IndexSummary {
                index: 1,
                file_count: inventory.files.len(),
                total_bytes,
                human_bytes: ByteSize::b(total_bytes).to_string(),
            }]
        };
        assign_names(&mut inventory.files, &prefix, &user, inventory.total_indexes, format);
        return Ok(());
    }

    // Stable sort descending by size. `sort_by` is a stable sort, so
    // equal-size files keep their walk order.
    let mut order: Vec<usize> = (0..inventory.files.len()).collect();
    order.sort_by(|&a, &b| inventory.files[b].size.cmp(&inventory.files[a].size));

    for &idx in &order {
        if inventory.files[idx].size > max_size {
            return Err(PackError::FileTooLarge {
                path: inventory.files[idx].path.clone(),
                size: inventory.files[idx].size,
                max_size,
            });
        }
    }

    let mut bins: Vec<Bin> = vec![Bin { remaining: max_size }];
    let mut assignment = vec![0u32; inventory.files.len()];

    for &idx in &order {
        let size = inventory.files[idx].size;
        let chosen = bins.iter().position(|b| b.remaining >= size);
        let bin_pos = match chosen {
            Some(pos) => pos,
            None => {
                bins.push(Bin { remaining: max_size });
                bins.len() - 1
            }
        };
        bins[bin_pos].remaining -= size;
        assignment[idx] = (bin_pos + 1) as u32;
    }

    for (idx, file) in inventory.files.iter_mut().enumerate() {
        file.suitcase_index = assignment[idx];
    }

    let total_indexes = bins.len() as u32;
    inventory.total_indexes = total_indexes;

    let mut summaries: Vec<IndexSummary> = (1..=total_indexes)
        .map(|index| IndexSummary {
            index,
            file_count: 0,
            total_bytes: 0,
            human_bytes: String::new(),
        })
        .collect();
    for file in &inventory.files {
        let summary = &mut summaries[(file.suitcase_index - 1) as usize];
        summary.file_count += 1;
        summary.total_bytes += file.size;
    }
    for summary in &mut summaries {
        summary.human_bytes = ByteSize::b(summary.total_bytes).to_string();
    }
    inventory.summaries = summaries;

    assign_names(&mut inventory.files, &prefix, &user, total_indexes, format);
    Ok(())
}

fn assign_names(
    files: &mut [FileRecord],
    prefix: &str,
    user: &str,
    total: u32,
    format: suitcasectl_manifest::SuitcaseFormat,
) {
    for file in files {
        if file.suitcase_index == 0 {
            continue;
        }
        file.suitcase_name = suitcase_name(prefix, user, file.suitcase_index, total, format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suitcasectl_manifest::{
        ArchiveTocMode, HashAlgorithm, InventoryFormat, OptionsSnapshot, SuitcaseFormat,
    };
    use std::path::PathBuf;

    fn options(max_size: u64) -> OptionsSnapshot {
        OptionsSnapshot {
            directories: vec![PathBuf::from("/src")],
            user: "joebob".to_string(),
            prefix: "snakey-thing".to_string(),
            max_suitcase_size: max_size,
            internal_metadata_glob: "*.meta".to_string(),
            external_metadata_files: Vec::new(),
            ignore_globs: Vec::new(),
            encrypt_inner: false,
            hash_inner: false,
            hash_outer: true,
            archive_toc: ArchiveTocMode::default(),
            follow_symlinks: false,
            suitcase_format: SuitcaseFormat::TarGz,
            inventory_format: InventoryFormat::Yaml,
            hash_algorithm: HashAlgorithm::Sha256,
            limit_file_count: None,
            transport: None,
        }
    }

    fn file(name: &str, size: u64) -> FileRecord {
        FileRecord {
            path: PathBuf::from(format!("/src/{name}")),
            destination: format!("/{name}"),
            base_name: name.to_string(),
            size,
            archive_toc: Vec::new(),
            suitcase_index: 0,
            suitcase_name: String::new(),
        }
    }

    /// Sizes {1, 2, 3}, max_size = 3 -> two bins, one holding the 3 B
    /// file alone, capacity respected by both.
    #[test]
    fn splits_into_two_bins_at_capacity() {
        let mut inv = Inventory::new(options(3));
        inv.files = vec![file("a", 1), file("b", 2), file("c", 3)];
        pack(&mut inv).unwrap();
        assert_eq!(inv.total_indexes, 2);
        for summary in &inv.summaries {
            assert!(summary.total_bytes <= 3);
        }
        let union: std::collections::BTreeSet<u32> =
            inv.files.iter().map(|f| f.suitcase_index).collect();
        assert_eq!(union, [1, 2].into_iter().collect());
    }

    /// Same inputs, max_size = 0 -> single bin holding everything.
    #[test]
    fn zero_max_size_is_unbounded() {
        let mut inv = Inventory::new(options(0));
        inv.files = vec![file("a", 1), file("b", 2), file("c", 3)];
        pack(&mut inv).unwrap();
        assert_eq!(inv.total_indexes, 1);
        assert!(inv.files.iter().all(|f| f.suitcase_index == 1));
    }

    /// {1, 3, 4}, max_size = 3 -> the 4 B file can never fit.
    #[test]
    fn too_large_file_is_fatal() {
        let mut inv = Inventory::new(options(3));
        inv.files = vec![file("a", 1), file("b", 3), file("c", 4)];
        let err = pack(&mut inv).unwrap_err();
        assert!(matches!(err, PackError::FileTooLarge { size: 4, max_size: 3, .. }));
    }

    /// Empty source root -> zero files, total_indexes = 0 (a deliberate
    /// choice: see DESIGN.md).
    #[test]
    fn empty_input_yields_zero_indexes() {
        let mut inv = Inventory::new(options(100));
        pack(&mut inv).unwrap();
        assert_eq!(inv.total_indexes, 0);
        assert!(inv.summaries.is_empty());
    }

    /// One 100 B file, custom prefix/user/format -> exact naming.
    #[test]
    fn single_file_naming() {
        let mut inv = Inventory::new(options(0));
        inv.files = vec![file("payload.bin", 100)];
        pack(&mut inv).unwrap();
        assert_eq!(inv.files[0].suitcase_name, "snakey-thing-joebob-01-of-01.tar.gz");
    }

    proptest::proptest! {
        #[test]
        fn every_file_is_assigned_and_within_capacity(
            sizes in proptest::collection::vec(1u64..=500, 0..40),
            max_size in 50u64..=1000,
        ) {
            let mut inv = Inventory::new(options(max_size));
            inv.files = sizes
                .into_iter()
                .filter(|s| *s <= max_size)
                .enumerate()
                .map(|(i, s)| file(&format!("f{i}"), s))
                .collect();
            let expected_count = inv.files.len();
            pack(&mut inv).unwrap();

            for file in &inv.files {
                proptest::prop_assert!(file.suitcase_index >= 1);
                proptest::prop_assert!(file.suitcase_index <= inv.total_indexes);
            }
            proptest::prop_assert_eq!(inv.files.len(), expected_count);
            for summary in &inv.summaries {
                proptest::prop_assert!(summary.total_bytes <= max_size);
            }
            for idx in 1..=inv.total_indexes {
                proptest::prop_assert!(inv.summaries.iter().any(|s| s.index == idx));
            }
        }
    }
}
