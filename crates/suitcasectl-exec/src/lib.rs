//! # suitcasectl-exec
//!
//! The Executor: a bounded-concurrency fan-out that packs one suitcase
//! index end-to-end per worker.
//!
//! ## What belongs here
//! * The worker pool, progress channel, and cancellation wiring
//! * Per-index suitcase assembly: streaming files through the
//!   WriterStack, inner hashing, inner encryption
//!
//! ## What does NOT belong here
//! * Deciding suitcase layout (`suitcasectl-pack`)
//! * Transport uploads and run-level status lifecycle (`suitcasectl-porter`)

mod error;
mod progress;

pub use error::ExecError;
pub use progress::ProgressEvent;

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::Sender;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use suitcasectl_hash::{digest_reader, HashEntry, HashSet, TeeReader};
use suitcasectl_manifest::{FileRecord, Inventory, OptionsSnapshot};
use suitcasectl_writer::{Encryptor, WriterStack};

/// One finished suitcase file.
#[derive(Debug, Clone)]
pub struct PackedSuitcase {
    pub index: u32,
    pub path: PathBuf,
    pub name: String,
    pub bytes_written: u64,
}

/// The result of packing a single index: either a finished suitcase or a
/// description of why it failed. Kept as a `String` rather than a typed
/// error because workers run on `spawn_blocking` and mix IO, writer-stack,
/// and encryption failures that don't share a common error type.
#[derive(Debug, Clone)]
pub struct IndexOutcome {
    pub index: u32,
    pub result: Result<PackedSuitcase, String>,
}

/// Everything the Executor produced for a run: one outcome per index, in
/// index order, plus the accumulated inner hash set.
pub struct ExecSummary {
    pub outcomes: Vec<IndexOutcome>,
    pub inner_hashes: HashSet,
}

/// A fixed-size pool of at most `C` worker tasks, each packing one
/// suitcase index end-to-end.
pub struct Executor {
    concurrency: usize,
}

impl Executor {
    pub fn new(concurrency: usize) -> Self {
        Self { concurrency: concurrency.max(1) }
    }

    /// Dispatch indices `1..=inventory.total_indexes`, bounded by the
    /// configured concurrency. `bytes_counter` accumulates every byte
    /// streamed into any suitcase across the whole run via atomic add.
    pub async fn run(
        &self,
        inventory: &Inventory,
        destination: &Path,
        encryptor: Option<Arc<dyn Encryptor>>,
        bytes_counter: Arc<AtomicU64>,
        progress_tx: Sender<ProgressEvent>,
        cancel: CancellationToken,
    ) -> Result<ExecSummary, ExecError> {
        std::fs::create_dir_all(destination).map_err(|source| ExecError::Destination { source })?;

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut join_set = tokio::task::JoinSet::new();

        for index in 1..=inventory.total_indexes {
            if cancel.is_cancelled() {
                tracing::info!(index, "cancellation observed, not dispatching further indices");
                break;
            }

            let files: Vec<FileRecord> = inventory
                .files
                .iter()
                .filter(|f| f.suitcase_index == index)
                .cloned()
                .collect();
            if files.is_empty() {
                continue;
            }

            let permit = semaphore.clone().acquire_owned().await.expect("semaphore never closed");
            let destination = destination.to_path_buf();
            let options = inventory.options.clone();
            let encryptor = encryptor.clone();
            let bytes_counter = bytes_counter.clone();
            let progress_tx = progress_tx.clone();
            let cancel = cancel.clone();

            join_set.spawn_blocking(move || {
                let _permit = permit;
                let result = pack_index(
                    index,
                    &files,
                    &destination,
                    &options,
                    encryptor,
                    &bytes_counter,
                    &progress_tx,
                    &cancel,
                );
                (index, result)
            });
        }

        let mut outcomes_by_index = std::collections::BTreeMap::new();
        let mut inner_hashes = HashSet::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, Ok((suitcase, hashes)))) => {
                    for h in hashes {
                        inner_hashes.push(h.filename, h.digest);
                    }
                    outcomes_by_index.insert(index, IndexOutcome { index, result: Ok(suitcase) });
                }
                Ok((index, Err(reason))) => {
                    tracing::warn!(index, %reason, "suitcase index failed");
                    outcomes_by_index.insert(index, IndexOutcome { index, result: Err(reason) });
                }
                Err(join_err) => {
                    tracing::error!(%join_err, "executor worker task panicked");
                }
            }
        }

        Ok(ExecSummary { outcomes: outcomes_by_index.into_values().collect(), inner_hashes })
    }
}

#[allow(clippy::too_many_arguments)]
fn pack_index(
    index: u32,
    files: &[FileRecord],
    destination: &Path,
    options: &OptionsSnapshot,
    encryptor: Option<Arc<dyn Encryptor>>,
    bytes_counter: &AtomicU64,
    progress_tx: &Sender<ProgressEvent>,
    cancel: &CancellationToken,
) -> Result<(PackedSuitcase, Vec<HashEntry>), String> {
    let name = files[0].suitcase_name.clone();
    let path = destination.join(&name);
    let total_files_in_index = files.len();

    let mut stack = WriterStack::open(&path, options.suitcase_format, encryptor.clone())
        .map_err(|e| e.to_string())?;

    let mut inner_hashes = Vec::new();

    for (ordinal, file) in files.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(index, ordinal, "cancellation observed mid-suitcase, finalizing in place");
            break;
        }

        let mut source = std::fs::File::open(&file.path).map_err(|e| {
            format!("reading {}: {e}", file.path.display())
        })?;

        let (bytes, size) = if options.encrypt_inner {
            let encryptor = encryptor.as_ref().ok_or("encrypt_inner set without a resolved encryptor")?;
            let mut plaintext = Vec::with_capacity(file.size as usize);
            std::io::Read::read_to_end(&mut source, &mut plaintext)
                .map_err(|e| format!("reading {}: {e}", file.path.display()))?;
            let ciphertext = encryptor.encrypt(&plaintext).map_err(|e| e.to_string())?;
            let size = ciphertext.len() as u64;
            (Cursored::Owned(Cursor::new(ciphertext)), size)
        } else {
            (Cursored::File(source), file.size)
        };

        if options.hash_inner {
            let mut tee = TeeReader::new(bytes, options.hash_algorithm);
            stack
                .append_file(&file.destination, &mut tee, size, 0o644)
                .map_err(|e| e.to_string())?;
            inner_hashes.push(HashEntry { filename: file.destination.clone(), digest: tee.finalize() });
        } else {
            stack.append_file(&file.destination, bytes, size, 0o644).map_err(|e| e.to_string())?;
        }

        bytes_counter.fetch_add(size, Ordering::Relaxed);

        let event = ProgressEvent {
            index,
            current_file_ordinal: ordinal + 1,
            total_files_in_index,
            completed: false,
        };
        let _ = progress_tx.blocking_send(event);
    }

    stack.finish().map_err(|e| e.to_string())?;
    let bytes_written = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    let _ = progress_tx.blocking_send(ProgressEvent {
        index,
        current_file_ordinal: total_files_in_index,
        total_files_in_index,
        completed: true,
    });

    Ok((PackedSuitcase { index, path, name, bytes_written }, inner_hashes))
}

/// Either an open source file or an in-memory ciphertext buffer, unified
/// behind `Read` so `pack_index` doesn't need a trait object per file.
enum Cursored {
    File(std::fs::File),
    Owned(Cursor<Vec<u8>>),
}

impl std::io::Read for Cursored {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Cursored::File(f) => f.read(buf),
            Cursored::Owned(c) => c.read(buf),
        }
    }
}

/// Hash every metadata file (inventory, log, invocation record) and every
/// closed suitcase — the outer hashes. Kept here since the Executor
/// already knows the finished suitcase paths; the Porter supplies the
/// rest of the metadata file set.
pub fn hash_outer_files(
    paths: impl IntoIterator<Item = (String, PathBuf)>,
    algorithm: suitcasectl_manifest::HashAlgorithm,
) -> Result<HashSet, String> {
    let mut set = HashSet::new();
    for (name, path) in paths {
        let file = std::fs::File::open(&path).map_err(|e| format!("hashing {}: {e}", path.display()))?;
        let digest = digest_reader(algorithm, file).map_err(|e| format!("hashing {}: {e}", path.display()))?;
        set.push(name, digest);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use suitcasectl_manifest::{
        ArchiveTocMode, HashAlgorithm, InventoryFormat, OptionsSnapshot, SuitcaseFormat,
    };
    use tokio::sync::mpsc;

    fn base_options(dirs: Vec<PathBuf>) -> OptionsSnapshot {
        OptionsSnapshot {
            directories: dirs,
            user: "tester".to_string(),
            prefix: "suitcase".to_string(),
            max_suitcase_size: 0,
            internal_metadata_glob: "*.suitcase-meta".to_string(),
            external_metadata_files: Vec::new(),
            ignore_globs: Vec::new(),
            encrypt_inner: false,
            hash_inner: true,
            hash_outer: true,
            archive_toc: ArchiveTocMode::default(),
            follow_symlinks: false,
            suitcase_format: SuitcaseFormat::Tar,
            inventory_format: InventoryFormat::Yaml,
            hash_algorithm: HashAlgorithm::Sha256,
            limit_file_count: None,
            transport: None,
        }
    }

    #[tokio::test]
    async fn packs_one_index_end_to_end() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let file_path = src.path().join("a.txt");
        std::fs::write(&file_path, b"payload").unwrap();

        let mut inventory = Inventory::new(base_options(vec![src.path().to_path_buf()]));
        inventory.files.push(FileRecord {
            path: file_path.clone(),
            destination: "/a.txt".to_string(),
            base_name: "a.txt".to_string(),
            size: 7,
            archive_toc: Vec::new(),
            suitcase_index: 1,
            suitcase_name: "suitcase-tester-01-of-01.tar".to_string(),
        });
        inventory.total_indexes = 1;

        let (tx, mut rx) = mpsc::channel(1);
        let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });

        let executor = Executor::new(2);
        let summary = executor
            .run(
                &inventory,
                dest.path(),
                None,
                Arc::new(AtomicU64::new(0)),
                tx,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        drain.await.unwrap();

        assert_eq!(summary.outcomes.len(), 1);
        let outcome = &summary.outcomes[0];
        assert_eq!(outcome.index, 1);
        let suitcase = outcome.result.as_ref().expect("index 1 should succeed");
        assert!(suitcase.path.exists());
        assert_eq!(suitcase.name, "suitcase-tester-01-of-01.tar");
        assert_eq!(summary.inner_hashes.entries().len(), 1);
        assert_eq!(summary.inner_hashes.entries()[0].filename, "/a.txt");
    }

    #[tokio::test]
    async fn missing_source_file_fails_only_its_own_index() {
        let dest = tempfile::tempdir().unwrap();
        let mut inventory = Inventory::new(base_options(Vec::new()));
        inventory.files.push(FileRecord {
            path: PathBuf::from("/nonexistent/a.txt"),
            destination: "/a.txt".to_string(),
            base_name: "a.txt".to_string(),
            size: 7,
            archive_toc: Vec::new(),
            suitcase_index: 1,
            suitcase_name: "suitcase-tester-01-of-01.tar".to_string(),
        });
        inventory.total_indexes = 1;

        let (tx, mut rx) = mpsc::channel(1);
        let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });

        let executor = Executor::new(1);
        let summary = executor
            .run(
                &inventory,
                dest.path(),
                None,
                Arc::new(AtomicU64::new(0)),
                tx,
                CancellationToken::new(),
            )
            .await
            .unwrap();
        drain.await.unwrap();

        assert_eq!(summary.outcomes.len(), 1);
        assert!(summary.outcomes[0].result.is_err());
    }
}
