//! Streaming (de)serialization of the inventory, and the naming-based
//! read path.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::ManifestError;
use crate::types::{Inventory, InventoryFormat};

/// Serialize any value to `writer` using the given inventory-format tag.
/// Shared by the inventory writer below and by the Porter's final
/// run-summary record, so "the chosen format" always means YAML or JSON,
/// never a third ad hoc shape.
pub fn write_value_to<T: Serialize>(
    value: &T,
    mut writer: impl Write,
    format: InventoryFormat,
) -> Result<(), ManifestError> {
    match format {
        InventoryFormat::Yaml => {
            serde_yaml::to_writer(&mut writer, value).map_err(|e| ManifestError::Encode {
                source: anyhow::Error::new(e),
            })?;
        }
        InventoryFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, value).map_err(|e| ManifestError::Encode {
                source: anyhow::Error::new(e),
            })?;
        }
    }
    Ok(())
}

/// Write the inventory to `path` using `format`.
///
/// YAML emission goes through a buffered writer and `serde_yaml`'s
/// streaming `to_writer`, so the full document is never materialized as a
/// single `String` for very large inventories. JSON is a direct marshal.
pub fn write_to(inventory: &Inventory, path: &Path, format: InventoryFormat) -> Result<(), ManifestError> {
    let file = File::create(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_value_to(inventory, &mut writer, format)?;
    writer.flush().map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Read an inventory from `path`, choosing the format by file extension.
/// Unknown extensions fail fast.
pub fn read_from(path: &Path) -> Result<Inventory, ManifestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ManifestError::UnknownExtension { path: path.to_path_buf() })?;
    let format = InventoryFormat::from_extension(ext)
        .ok_or_else(|| ManifestError::UnknownExtension { path: path.to_path_buf() })?;

    let file = File::open(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    match format {
        InventoryFormat::Yaml => serde_yaml::from_reader(reader).map_err(|e| ManifestError::Decode {
            path: path.to_path_buf(),
            source: anyhow::Error::new(e),
        }),
        InventoryFormat::Json => serde_json::from_reader(reader).map_err(|e| ManifestError::Decode {
            path: path.to_path_buf(),
            source: anyhow::Error::new(e),
        }),
    }
}

/// Serialize the inventory to an in-memory byte buffer, for use as the
/// input to a Porter-side fingerprint hash. Always JSON — deterministic
/// key ordering matters more here than readability.
pub fn to_fingerprint_bytes(inventory: &Inventory) -> Result<Vec<u8>, ManifestError> {
    serde_json::to_vec(inventory).map_err(|e| ManifestError::Encode {
        source: anyhow::Error::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArchiveTocMode, HashAlgorithm, OptionsSnapshot, SuitcaseFormat};
    use std::path::PathBuf;

    fn sample_inventory() -> Inventory {
        let options = OptionsSnapshot {
            directories: vec![PathBuf::from("/data")],
            user: "joebob".to_string(),
            prefix: "snakey-thing".to_string(),
            max_suitcase_size: 1024,
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
        };
        Inventory::new(options)
    }

    #[test]
    fn yaml_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.yaml");
        let inv = sample_inventory();
        write_to(&inv, &path, InventoryFormat::Yaml).unwrap();
        let back = read_from(&path).unwrap();
        assert_eq!(inv, back);
    }

    #[test]
    fn json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        let inv = sample_inventory();
        write_to(&inv, &path, InventoryFormat::Json).unwrap();
        let back = read_from(&path).unwrap();
        assert_eq!(inv, back);
    }

    #[test]
    fn unknown_extension_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.toml");
        std::fs::write(&path, b"files = []").unwrap();
        let err = read_from(&path).unwrap_err();
        assert!(matches!(err, ManifestError::UnknownExtension { .. }));
    }
}
