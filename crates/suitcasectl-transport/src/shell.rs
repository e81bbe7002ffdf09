use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::TransportError;
use crate::retry::with_backoff;
use crate::{Transport, TransportStatus};

/// Runs a configured shell command per artifact, passing the artifact
/// path and fingerprint as positional arguments ("a shell pipeline
/// invocation" per the Glossary).
pub struct ShellTransport {
    program: String,
    base_args: Vec<String>,
    retry_count: u32,
    retry_interval: Duration,
}

impl ShellTransport {
    pub fn new(program: impl Into<String>, base_args: Vec<String>, retry_count: u32, retry_interval: Duration) -> Self {
        Self { program: program.into(), base_args, retry_count, retry_interval }
    }

    async fn run(&self, extra_args: &[&str]) -> Result<(), TransportError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args).args(extra_args);
        let status = cmd
            .status()
            .await
            .map_err(|source| TransportError::Io { path: self.program.clone().into(), source })?;
        if status.success() {
            Ok(())
        } else {
            Err(TransportError::ShellExit { command: self.program.clone(), code: status.code() })
        }
    }
}

#[async_trait]
impl Transport for ShellTransport {
    async fn upload(&self, path: &Path, fingerprint: &str) -> Result<u64, TransportError> {
        let path_str = path.to_string_lossy().into_owned();
        let size = tokio::fs::metadata(path)
            .await
            .map(|m| m.len())
            .map_err(|source| TransportError::Io { path: path.to_path_buf(), source })?;

        with_backoff(self.retry_count, self.retry_interval, || {
            self.run(&[path_str.as_str(), fingerprint])
        })
        .await?;
        Ok(size)
    }

    async fn send_update(&self, status: TransportStatus) -> Result<(), TransportError> {
        with_backoff(self.retry_count, self.retry_interval, || {
            self.run(&["status", status.as_str()])
        })
        .await
    }

    fn status_url(&self) -> Option<String> {
        None
    }
}
