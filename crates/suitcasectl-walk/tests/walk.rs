//! Integration tests for the Walker, against real temp-directory trees.

use std::fs;

use suitcasectl_manifest::{ArchiveTocMode, HashAlgorithm, InventoryFormat, OptionsSnapshot, SuitcaseFormat};
use suitcasectl_walk::walk;
use tempfile::TempDir;

fn base_options(root: &TempDir) -> OptionsSnapshot {
    OptionsSnapshot {
        directories: vec![root.path().to_path_buf()],
        user: "joebob".to_string(),
        prefix: "bag".to_string(),
        max_suitcase_size: 0,
        internal_metadata_glob: "*.nonexistent-suffix".to_string(),
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

#[test]
fn directories_are_descended_not_recorded() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("a/b")).unwrap();
    fs::write(root.path().join("a/b/y.txt"), b"hello").unwrap();

    let outcome = walk(&base_options(&root)).unwrap();
    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.files[0].destination, "/a/b/y.txt");
    assert_eq!(outcome.files[0].size, 5);
}

#[test]
fn ignore_glob_skips_matching_base_names() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("keep.txt"), b"x").unwrap();
    fs::write(root.path().join("skip.log"), b"y").unwrap();

    let mut options = base_options(&root);
    options.ignore_globs = vec!["*.log".to_string()];
    let outcome = walk(&options).unwrap();

    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.files[0].base_name, "keep.txt");
}

#[test]
fn limit_file_count_halts_without_error() {
    let root = TempDir::new().unwrap();
    for i in 0..10 {
        fs::write(root.path().join(format!("f{i}.txt")), b"x").unwrap();
    }

    let mut options = base_options(&root);
    options.limit_file_count = Some(3);
    let outcome = walk(&options).unwrap();

    assert_eq!(outcome.files.len(), 3);
}

#[cfg(unix)]
#[test]
fn symlink_to_directory_is_never_followed() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("real")).unwrap();
    fs::write(root.path().join("real/inside.txt"), b"payload").unwrap();
    std::os::unix::fs::symlink(root.path().join("real"), root.path().join("link")).unwrap();

    let mut options = base_options(&root);
    options.follow_symlinks = true;
    let outcome = walk(&options).unwrap();

    // Only the real file is seen; the symlinked directory is never
    // descended, even with follow_symlinks=true.
    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.files[0].destination, "/real/inside.txt");
}

#[cfg(unix)]
#[test]
fn symlink_to_file_uses_target_size_and_link_destination() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("target.bin"), b"0123456789").unwrap();
    std::os::unix::fs::symlink(root.path().join("target.bin"), root.path().join("alias.bin")).unwrap();

    let mut options = base_options(&root);
    options.follow_symlinks = true;
    let outcome = walk(&options).unwrap();

    let alias = outcome
        .files
        .iter()
        .find(|f| f.destination == "/alias.bin")
        .expect("alias.bin recorded");
    assert_eq!(alias.size, 10);
}

#[cfg(unix)]
#[test]
fn symlinks_are_skipped_entirely_when_not_following() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("target.bin"), b"0123456789").unwrap();
    std::os::unix::fs::symlink(root.path().join("target.bin"), root.path().join("alias.bin")).unwrap();

    let options = base_options(&root);
    let outcome = walk(&options).unwrap();

    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.files[0].base_name, "target.bin");
}

#[test]
fn external_metadata_rejects_binary_content() {
    let root = TempDir::new().unwrap();
    let meta_path = root.path().join("notes.bin");
    fs::write(&meta_path, [0u8, 1, 2, 0, 3, 0, 4, 0]).unwrap();

    let mut options = base_options(&root);
    options.external_metadata_files = vec![meta_path];
    let err = walk(&options).unwrap_err();
    assert!(matches!(err, suitcasectl_walk::WalkError::NotText { .. }));
}

#[test]
fn internal_metadata_glob_collects_text_files() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("README.meta"), b"project notes").unwrap();
    fs::write(root.path().join("data.bin"), b"irrelevant").unwrap();

    let mut options = base_options(&root);
    options.internal_metadata_glob = "*.meta".to_string();
    let outcome = walk(&options).unwrap();

    assert_eq!(outcome.internal_metadata.len(), 1);
    let (path, content) = outcome.internal_metadata.iter().next().unwrap();
    assert!(path.ends_with("README.meta"));
    assert_eq!(content, "project notes");
}

proptest::proptest! {
    /// For any set of distinct safe file names, every non-ignored name is
    /// discovered exactly once and every ignored name never appears,
    /// regardless of how many of each are mixed into the same root.
    #[test]
    fn ignore_glob_partitions_discovered_files(
        kept in proptest::collection::hash_set("[a-z]{1,8}", 0..6),
        skipped_stems in proptest::collection::hash_set("[a-z]{1,8}", 0..6),
    ) {
        let root = TempDir::new().unwrap();
        for name in &kept {
            fs::write(root.path().join(format!("{name}.txt")), b"x").unwrap();
        }
        for stem in &skipped_stems {
            if !kept.contains(stem) {
                fs::write(root.path().join(format!("{stem}.skip")), b"x").unwrap();
            }
        }

        let mut options = base_options(&root);
        options.ignore_globs = vec!["*.skip".to_string()];
        let outcome = walk(&options).unwrap();

        let discovered: std::collections::HashSet<String> =
            outcome.files.iter().map(|f| f.base_name.clone()).collect();

        for name in &kept {
            proptest::prop_assert!(discovered.contains(&format!("{name}.txt")));
        }
        proptest::prop_assert!(discovered.iter().all(|n| !n.ends_with(".skip")));
        proptest::prop_assert_eq!(discovered.len(), kept.len());
    }
}
