//! # suitcasectl-transport
//!
//! The Transport interface and its three implementations.
//!
//! ## What belongs here
//! * The `Transport` trait and `TransportStatus` enum
//! * `NullTransport`, `ShellTransport`, `CloudTransport`
//! * The shared `retry_count × retry_interval` backoff
//!
//! ## What does NOT belong here
//! * Deciding *when* to upload or which files get uploaded (`suitcasectl-porter`)

mod cloud;
mod error;
mod null;
mod retry;
mod shell;

pub use cloud::CloudTransport;
pub use error::TransportError;
pub use null::NullTransport;
pub use retry::with_backoff;
pub use shell::ShellTransport;

use std::path::Path;

use async_trait::async_trait;

/// A sink capable of uploading a finished suitcase artifact and relaying
/// its status. Implementations must be safe for concurrent use, since the
/// Porter shares one handle across upload tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn upload(&self, path: &Path, fingerprint: &str) -> Result<u64, TransportError>;
    async fn send_update(&self, status: TransportStatus) -> Result<(), TransportError>;
    fn status_url(&self) -> Option<String>;
}

/// Lifecycle of one run's transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportStatus {
    Pending,
    InProgress,
    Complete,
    Failed,
}

impl TransportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportStatus::Pending => "pending",
            TransportStatus::InProgress => "in_progress",
            TransportStatus::Complete => "complete",
            TransportStatus::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn null_transport_is_a_no_op() {
        let t = NullTransport;
        assert_eq!(t.upload(Path::new("/tmp/x"), "abc").await.unwrap(), 0);
        t.send_update(TransportStatus::Complete).await.unwrap();
        assert_eq!(t.status_url(), None);
    }

    #[tokio::test]
    async fn with_backoff_retries_until_success() {
        let attempts = AtomicU32::new(0);
        let result: Result<u32, TransportError> = with_backoff(3, Duration::from_millis(1), || async {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(TransportError::Http { reason: "transient".to_string() })
            } else {
                Ok(n)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn with_backoff_gives_up_after_retry_count_exhausted() {
        let result: Result<(), TransportError> =
            with_backoff(2, Duration::from_millis(1), || async {
                Err(TransportError::Http { reason: "always fails".to_string() })
            })
            .await;
        assert!(matches!(result, Err(TransportError::RetriesExhausted { attempts: 3 })));
    }

    #[test]
    fn status_strings_match_spec_enum() {
        assert_eq!(TransportStatus::Pending.as_str(), "pending");
        assert_eq!(TransportStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TransportStatus::Complete.as_str(), "complete");
        assert_eq!(TransportStatus::Failed.as_str(), "failed");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_transport_runs_configured_command_with_artifact_args() {
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("invoked.txt");
        let artifact = dir.path().join("suitcase.tar.gz");
        std::fs::write(&artifact, b"0123456789").unwrap();

        // `sh -c 'printf "%s" "$1" > marker'` lets us assert the transport
        // actually forwards the artifact path and fingerprint as args.
        let transport = ShellTransport::new(
            "sh",
            vec![
                "-c".to_string(),
                format!("printf '%s %s' \"$1\" \"$2\" > {}", marker.display()),
                "sh".to_string(),
            ],
            0,
            Duration::from_millis(1),
        );

        let size = transport.upload(&artifact, "deadbeef").await.unwrap();
        assert_eq!(size, 10);

        let recorded = std::fs::read_to_string(&marker).unwrap();
        assert_eq!(recorded, format!("{} deadbeef", artifact.display()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_transport_upload_surfaces_nonzero_exit() {
        let transport = ShellTransport::new("false", Vec::new(), 0, Duration::from_millis(1));
        let artifact = tempfile::NamedTempFile::new().unwrap();
        let err = transport.upload(artifact.path(), "fp").await.unwrap_err();
        assert!(matches!(err, TransportError::ShellExit { code: Some(1), .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_transport_send_update_passes_status_string() {
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("status.txt");
        let transport = ShellTransport::new(
            "sh",
            vec!["-c".to_string(), format!("printf '%s' \"$2\" > {}", marker.display()), "sh".to_string()],
            0,
            Duration::from_millis(1),
        );

        transport.send_update(TransportStatus::Complete).await.unwrap();
        assert_eq!(std::fs::read_to_string(&marker).unwrap(), "complete");
    }
}
