//! # suitcasectl-porter
//!
//! The Porter: the run coordinator tying every other component together.
//!
//! ## What belongs here
//! * Destination resolution, inventory build-or-load, fingerprinting
//! * Transport status lifecycle and per-artifact uploads
//! * The final run-summary record
//!
//! ## What does NOT belong here
//! * Any of C1–C7's own logic — the Porter only calls into them

mod error;
mod fingerprint;
mod summary;
mod toc;

pub use error::PorterError;
pub use fingerprint::inventory_fingerprint;
pub use summary::{HashLine, RunSummary};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use suitcasectl_exec::Executor;
use suitcasectl_manifest::{
    digest_bin_file_name, digest_text_file_name, inventory_file_name, write_to, write_value_to,
    Inventory, InventoryFormat, InvocationMeta, HashAlgorithm,
};
use suitcasectl_options::ResolvedOptions;
use suitcasectl_transport::{Transport, TransportStatus};
use suitcasectl_writer::{Encryptor, PgpEncryptor};

/// The run coordinator. Holds the (optional) transport handle shared by
/// the whole run; everything else is a parameter of [`Porter::run`].
pub struct Porter {
    transport: Option<Arc<dyn Transport>>,
}

impl Porter {
    pub fn new(transport: Option<Arc<dyn Transport>>) -> Self {
        Self { transport }
    }

    /// Run one invocation end-to-end: resolve the destination, build or
    /// load the inventory, pack and write suitcases (unless
    /// `only_inventory`), emit metadata files, and report a final
    /// summary. `explicit_flags`/`default_flags` are the CLI-layer's flag
    /// provenance, recorded verbatim in the invocation record.
    pub async fn run(
        &self,
        resolved: &ResolvedOptions,
        explicit_flags: &[String],
        default_flags: &[String],
    ) -> Result<RunSummary, PorterError> {
        let start_time = now_rfc3339();
        let destination = resolve_destination(resolved.destination.as_deref())?;
        std::fs::create_dir_all(&destination)
            .map_err(|source| PorterError::Destination { path: destination.clone(), source })?;

        let mut inventory = self.build_or_load_inventory(resolved)?;
        let fingerprint = inventory_fingerprint(&inventory)?;

        if let Some(transport) = &self.transport {
            let _ = transport.send_update(TransportStatus::Pending).await;
        }

        let ext = resolved.snapshot.inventory_format.extension();
        let inventory_path = destination.join(inventory_file_name(ext));

        if resolved.only_inventory {
            write_to(&inventory, &inventory_path, resolved.snapshot.inventory_format)?;
            let end_time = now_rfc3339();
            write_invocation_meta(
                &destination,
                &resolved.snapshot.user,
                &start_time,
                &end_time,
                explicit_flags,
                default_flags,
                &resolved.snapshot_map(),
            )?;
            return Ok(RunSummary {
                destination,
                source_directories: resolved.snapshot.directories.clone(),
                suitcase_names: Vec::new(),
                metadata_files: vec![inventory_file_name(ext)],
                inventory_fingerprint: fingerprint,
                bytes_transferred: 0,
                hashes: Vec::new(),
                failed_indices: Vec::new(),
            });
        }

        if let Some(transport) = &self.transport {
            let _ = transport.send_update(TransportStatus::InProgress).await;
        }

        let encryptor = resolve_encryptor(resolved)?;

        let bytes_counter = Arc::new(AtomicU64::new(0));
        let (tx, mut rx) = mpsc::channel(1);
        let progress_task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracing::info!(
                    index = event.index,
                    file = event.current_file_ordinal,
                    total = event.total_files_in_index,
                    completed = event.completed,
                    "packing progress"
                );
            }
        });

        let executor = Executor::new(resolved.concurrency);
        let exec_summary = executor
            .run(
                &inventory,
                &destination,
                encryptor.clone(),
                bytes_counter.clone(),
                tx,
                CancellationToken::new(),
            )
            .await?;
        let _ = progress_task.await;

        let mut suitcases = Vec::new();
        let mut failures = Vec::new();
        for outcome in &exec_summary.outcomes {
            match &outcome.result {
                Ok(packed) => suitcases.push(packed.clone()),
                Err(reason) => failures.push((outcome.index, reason.clone())),
            }
        }

        if suitcases.is_empty() && !failures.is_empty() {
            if let Some(transport) = &self.transport {
                let _ = transport.send_update(TransportStatus::Failed).await;
            }
            return Err(PorterError::AllIndicesFailed { failures });
        }

        write_to(&inventory, &inventory_path, resolved.snapshot.inventory_format)?;
        let mut metadata_files = vec![inventory_file_name(ext)];

        let mut hash_lines = Vec::new();
        if resolved.snapshot.hash_outer {
            let mut targets: Vec<(String, PathBuf)> =
                suitcases.iter().map(|s| (s.name.clone(), s.path.clone())).collect();
            targets.push((inventory_file_name(ext), inventory_path.clone()));

            let outer = suitcasectl_exec::hash_outer_files(targets, resolved.snapshot.hash_algorithm)
                .map_err(|reason| PorterError::Writer(suitcasectl_writer::WriterError::Encrypt { reason }))?;

            let tag = resolved.snapshot.hash_algorithm.tag();
            let text_path = destination.join(digest_text_file_name(tag));
            let bin_path = destination.join(digest_bin_file_name(tag));
            suitcasectl_hash::write_text_digest_file(&text_path, outer.entries())
                .map_err(|source| PorterError::Destination { path: text_path.clone(), source })?;
            suitcasectl_hash::write_bin_digest_file(&bin_path, outer.entries())
                .map_err(|source| PorterError::Destination { path: bin_path.clone(), source })?;
            metadata_files.push(digest_text_file_name(tag));
            metadata_files.push(digest_bin_file_name(tag));

            hash_lines = outer
                .entries()
                .iter()
                .map(|e| HashLine { filename: e.filename.clone(), digest: e.digest.clone() })
                .collect();
            for entry in exec_summary.inner_hashes.entries() {
                hash_lines.push(HashLine { filename: entry.filename.clone(), digest: entry.digest.clone() });
            }
        }

        let end_time = now_rfc3339();
        write_invocation_meta(
            &destination,
            &resolved.snapshot.user,
            &start_time,
            &end_time,
            explicit_flags,
            default_flags,
            &resolved.snapshot_map(),
        )?;
        metadata_files.push(suitcasectl_manifest::INVOCATION_META_FILE_NAME.to_string());

        let mut bytes_transferred = 0u64;
        if let Some(transport) = &self.transport {
            let mut artifacts: Vec<PathBuf> = suitcases.iter().map(|s| s.path.clone()).collect();
            artifacts.push(inventory_path.clone());
            artifacts.push(destination.join(suitcasectl_manifest::INVOCATION_META_FILE_NAME));
            for artifact in artifacts {
                match transport.upload(&artifact, &fingerprint).await {
                    Ok(n) => bytes_transferred += n,
                    Err(err) => tracing::warn!(path = %artifact.display(), %err, "transport upload failed"),
                }
            }
            let status = if failures.is_empty() { TransportStatus::Complete } else { TransportStatus::Failed };
            let _ = transport.send_update(status).await;
        }

        let summary = RunSummary {
            destination: destination.clone(),
            source_directories: resolved.snapshot.directories.clone(),
            suitcase_names: suitcases.iter().map(|s| s.name.clone()).collect(),
            metadata_files,
            inventory_fingerprint: fingerprint,
            bytes_transferred,
            hashes: hash_lines,
            failed_indices: failures.iter().map(|(i, r)| format!("{i}: {r}")).collect(),
        };

        write_value_to(&summary, std::io::stdout(), resolved.snapshot.inventory_format)
            .map_err(PorterError::Manifest)?;

        Ok(summary)
    }

    fn build_or_load_inventory(&self, resolved: &ResolvedOptions) -> Result<Inventory, PorterError> {
        if let Some(path) = &resolved.inventory_file {
            return Ok(suitcasectl_manifest::read_from(path)?);
        }

        let outcome = suitcasectl_walk::walk(&resolved.snapshot)?;
        let mut inventory = Inventory::new(resolved.snapshot.clone());
        inventory.files = outcome.files;
        inventory.internal_metadata = outcome.internal_metadata;
        inventory.external_metadata = outcome.external_metadata;

        toc::attach_archive_tocs(&mut inventory.files, resolved.snapshot.archive_toc);

        suitcasectl_pack::pack(&mut inventory)?;
        Ok(inventory)
    }
}

fn resolve_encryptor(resolved: &ResolvedOptions) -> Result<Option<Arc<dyn Encryptor>>, PorterError> {
    let needs_encryption = resolved.snapshot.suitcase_format.is_encrypted() || resolved.snapshot.encrypt_inner;
    if !needs_encryption {
        return Ok(None);
    }
    let encryptor = PgpEncryptor::load(&resolved.public_keys)?;
    Ok(Some(Arc::new(encryptor) as Arc<dyn Encryptor>))
}

fn resolve_destination(configured: Option<&Path>) -> Result<PathBuf, PorterError> {
    match configured {
        Some(path) => Ok(path.to_path_buf()),
        None => {
            let suffix: u64 = rand::random();
            Ok(std::env::temp_dir().join(format!("suitcasectl-{suffix:016x}")))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn write_invocation_meta(
    destination: &Path,
    user: &str,
    start_time: &str,
    end_time: &str,
    explicit_flags: &[String],
    default_flags: &[String],
    merged_config: &BTreeMap<String, String>,
) -> Result<(), PorterError> {
    let invocation = InvocationMeta {
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hostname: hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string()),
        user: user.to_string(),
        explicit_flags: explicit_flags.to_vec(),
        default_flags: default_flags.to_vec(),
        merged_config: merged_config.clone(),
    };
    let path = destination.join(suitcasectl_manifest::INVOCATION_META_FILE_NAME);
    let file = std::fs::File::create(&path).map_err(|source| PorterError::Destination { path: path.clone(), source })?;
    write_value_to(&invocation, file, InventoryFormat::Yaml).map_err(PorterError::Manifest)
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

trait SnapshotMap {
    fn snapshot_map(&self) -> BTreeMap<String, String>;
}

impl SnapshotMap for ResolvedOptions {
    fn snapshot_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("prefix".to_string(), self.snapshot.prefix.clone());
        map.insert("user".to_string(), self.snapshot.user.clone());
        map.insert("suitcase_format".to_string(), self.snapshot.suitcase_format.suffix().to_string());
        map.insert("inventory_format".to_string(), self.snapshot.inventory_format.extension().to_string());
        map.insert("hash_algorithm".to_string(), self.snapshot.hash_algorithm.tag().to_string());
        map.insert("max_suitcase_size".to_string(), self.snapshot.max_suitcase_size.to_string());
        map.insert("concurrency".to_string(), self.concurrency.to_string());
        map.insert("retry_count".to_string(), self.retry_count.to_string());
        map
    }
}
