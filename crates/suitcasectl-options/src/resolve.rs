use std::path::PathBuf;
use std::time::Duration;

use suitcasectl_manifest::{ArchiveTocMode, HashAlgorithm, InventoryFormat, OptionsSnapshot, SuitcaseFormat};

use crate::cli::SuitcaseArgs;
use crate::config_file::ConfigFile;
use crate::defaults::Defaults;
use crate::error::OptionsError;

/// Everything a run needs beyond what `OptionsSnapshot` persists: the
/// destination, concurrency/retry knobs, and anything else that's a
/// property of *this invocation* rather than of the packed inventory.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub snapshot: OptionsSnapshot,
    pub destination: Option<PathBuf>,
    pub inventory_file: Option<PathBuf>,
    pub only_inventory: bool,
    pub concurrency: usize,
    pub retry_count: u32,
    pub retry_interval: Duration,
    pub public_keys: Vec<PathBuf>,
}

/// Merge compiled defaults (layer 1), a `suitcasectl.*` file discovered in
/// a source root (layer 2), and explicit CLI flags (layer 3). Later
/// layers override earlier ones.
pub fn resolve(args: SuitcaseArgs) -> Result<ResolvedOptions, OptionsError> {
    validate_source_roots(&args)?;

    let config = crate::config_file::discover(&args.directories)?;

    let user = args
        .user
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.user.clone()))
        .unwrap_or_else(whoami::username);

    let prefix = args
        .prefix
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.prefix.clone()))
        .unwrap_or_else(|| Defaults::PREFIX.to_string());
    if prefix.contains('/') || prefix.contains('\\') {
        return Err(OptionsError::ForbiddenPrefixChar { prefix });
    }

    let max_suitcase_size = match args
        .max_suitcase_size
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.max_suitcase_size.clone()))
    {
        Some(raw) => parse_size(&raw)?,
        None => Defaults::MAX_SUITCASE_SIZE,
    };

    let suitcase_format = match args
        .suitcase_format
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.suitcase_format.clone()))
    {
        Some(raw) => parse_suitcase_format(&raw)?,
        None => Defaults::SUITCASE_FORMAT,
    };

    let inventory_format = match args
        .inventory_format
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.inventory_format.clone()))
    {
        Some(raw) => parse_inventory_format(&raw)?,
        None => Defaults::INVENTORY_FORMAT,
    };

    let hash_algorithm = match args
        .hash_algorithm
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.hash_algorithm.clone()))
    {
        Some(raw) => parse_hash_algorithm(&raw)?,
        None => Defaults::HASH_ALGORITHM,
    };

    let internal_metadata_glob = args
        .internal_metadata_glob
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.internal_metadata_glob.clone()))
        .unwrap_or_else(|| Defaults::INTERNAL_METADATA_GLOB.to_string());

    let mut ignore_globs = args.ignore_globs.clone();
    if let Some(c) = &config {
        ignore_globs.extend(c.ignore_glob.iter().cloned());
    }

    let mut external_metadata_files = args.external_metadata_files.clone();
    if let Some(c) = &config {
        external_metadata_files.extend(c.external_metadata_file.iter().cloned());
    }

    let hash_inner = args.hash_inner || config.as_ref().and_then(|c| c.hash_inner).unwrap_or(false);
    // hash_outer defaults to true in this entry point; see DESIGN.md's
    // open-question note on why.
    let hash_outer = args.hash_outer || config.as_ref().and_then(|c| c.hash_outer).unwrap_or(true);
    let encrypt_inner =
        args.encrypt_inner || config.as_ref().and_then(|c| c.encrypt_inner).unwrap_or(false);
    let follow_symlinks =
        args.follow_symlinks || config.as_ref().and_then(|c| c.follow_symlinks).unwrap_or(false);

    let concurrency = args
        .concurrency
        .or_else(|| config.as_ref().and_then(|c| c.concurrency))
        .unwrap_or(Defaults::CONCURRENCY);
    let retry_count = args
        .retry_count
        .or_else(|| config.as_ref().and_then(|c| c.retry_count))
        .unwrap_or(Defaults::RETRY_COUNT);
    let retry_interval = args
        .retry_interval
        .or_else(|| config.as_ref().and_then(|c| c.retry_interval_secs))
        .map(Duration::from_secs)
        .unwrap_or(Defaults::RETRY_INTERVAL);

    let directories: Vec<PathBuf> = args
        .directories
        .iter()
        .map(|d| absolute(d))
        .collect();

    let snapshot = OptionsSnapshot {
        directories,
        user,
        prefix,
        max_suitcase_size,
        internal_metadata_glob,
        external_metadata_files,
        ignore_globs,
        encrypt_inner,
        hash_inner,
        hash_outer,
        archive_toc: ArchiveTocMode { shallow: args.archive_toc, deep: args.archive_toc_deep },
        follow_symlinks,
        suitcase_format,
        inventory_format,
        hash_algorithm,
        limit_file_count: args.limit_file_count,
        transport: None,
    };

    Ok(ResolvedOptions {
        snapshot,
        destination: args.destination,
        inventory_file: args.inventory_file,
        only_inventory: args.only_inventory,
        concurrency,
        retry_count,
        retry_interval,
        public_keys: args.public_keys,
    })
}

fn validate_source_roots(args: &SuitcaseArgs) -> Result<(), OptionsError> {
    if args.inventory_file.is_some() {
        if !args.directories.is_empty() {
            return Err(OptionsError::InventoryFileAndSourceRoots);
        }
        if args.only_inventory {
            return Err(OptionsError::OnlyInventoryWithInventoryFile);
        }
        return Ok(());
    }
    if args.directories.is_empty() {
        return Err(OptionsError::NoSourceRootsOrInventoryFile);
    }
    let mut seen = std::collections::BTreeSet::new();
    for dir in &args.directories {
        let abs = absolute(dir);
        if !seen.insert(abs.clone()) {
            return Err(OptionsError::DuplicateSourceRoot { path: abs });
        }
    }
    Ok(())
}

fn absolute(path: &std::path::Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn parse_size(raw: &str) -> Result<u64, OptionsError> {
    if raw.trim() == "0" {
        return Ok(0);
    }
    raw.parse::<bytesize::ByteSize>()
        .map(|b| b.as_u64())
        .map_err(|reason| OptionsError::BadSize { value: raw.to_string(), reason })
}

fn parse_suitcase_format(raw: &str) -> Result<SuitcaseFormat, OptionsError> {
    SuitcaseFormat::from_suffix(raw).ok_or_else(|| OptionsError::BadSize {
        value: raw.to_string(),
        reason: "unknown suitcase format tag".to_string(),
    })
}

fn parse_inventory_format(raw: &str) -> Result<InventoryFormat, OptionsError> {
    InventoryFormat::from_extension(raw).ok_or_else(|| OptionsError::BadSize {
        value: raw.to_string(),
        reason: "unknown inventory format tag".to_string(),
    })
}

fn parse_hash_algorithm(raw: &str) -> Result<HashAlgorithm, OptionsError> {
    Ok(match raw {
        "md5" => HashAlgorithm::Md5,
        "sha1" => HashAlgorithm::Sha1,
        "sha256" => HashAlgorithm::Sha256,
        "sha512" => HashAlgorithm::Sha512,
        "none" => HashAlgorithm::None,
        _ => {
            return Err(OptionsError::BadSize {
                value: raw.to_string(),
                reason: "unknown hash algorithm tag".to_string(),
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dirs: Vec<&str>) -> SuitcaseArgs {
        SuitcaseArgs {
            directories: dirs.into_iter().map(PathBuf::from).collect(),
            destination: None,
            inventory_file: None,
            only_inventory: false,
            inventory_format: None,
            suitcase_format: None,
            hash_algorithm: None,
            hash_inner: false,
            hash_outer: false,
            encrypt_inner: false,
            public_keys: Vec::new(),
            max_suitcase_size: None,
            concurrency: None,
            retry_count: None,
            retry_interval: None,
            follow_symlinks: false,
            ignore_globs: Vec::new(),
            internal_metadata_glob: None,
            external_metadata_files: Vec::new(),
            limit_file_count: None,
            user: None,
            prefix: None,
            archive_toc: false,
            archive_toc_deep: false,
        }
    }

    #[test]
    fn defaults_apply_when_nothing_set() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve(args(vec![dir.path().to_str().unwrap()])).unwrap();
        assert_eq!(resolved.snapshot.prefix, "suitcase");
        assert_eq!(resolved.snapshot.max_suitcase_size, Defaults::MAX_SUITCASE_SIZE);
        assert_eq!(resolved.concurrency, 10);
        assert!(resolved.snapshot.hash_outer);
    }

    #[test]
    fn human_readable_size_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(vec![dir.path().to_str().unwrap()]);
        a.max_suitcase_size = Some("2GiB".to_string());
        let resolved = resolve(a).unwrap();
        assert_eq!(resolved.snapshot.max_suitcase_size, 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn zero_means_unbounded() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(vec![dir.path().to_str().unwrap()]);
        a.max_suitcase_size = Some("0".to_string());
        let resolved = resolve(a).unwrap();
        assert_eq!(resolved.snapshot.max_suitcase_size, 0);
    }

    #[test]
    fn prefix_with_separator_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(vec![dir.path().to_str().unwrap()]);
        a.prefix = Some("a/b".to_string());
        assert!(matches!(resolve(a), Err(OptionsError::ForbiddenPrefixChar { .. })));
    }

    #[test]
    fn duplicate_source_roots_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().to_str().unwrap();
        let a = args(vec![p, p]);
        assert!(matches!(resolve(a), Err(OptionsError::DuplicateSourceRoot { .. })));
    }

    #[test]
    fn no_roots_and_no_inventory_file_is_rejected() {
        let a = args(vec![]);
        assert!(matches!(resolve(a), Err(OptionsError::NoSourceRootsOrInventoryFile)));
    }

    #[test]
    fn inventory_file_with_source_roots_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(vec![dir.path().to_str().unwrap()]);
        a.inventory_file = Some(PathBuf::from("inventory.yaml"));
        assert!(matches!(resolve(a), Err(OptionsError::InventoryFileAndSourceRoots)));
    }
}
