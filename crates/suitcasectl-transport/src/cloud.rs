use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::TransportError;
use crate::retry::with_backoff;
use crate::{Transport, TransportStatus};

/// A generic stand-in for "a cloud object store": `PUT`s the artifact to
/// `{base_url}/{fingerprint}` and `POST`s status JSON to `status_url`.
pub struct CloudTransport {
    client: reqwest::Client,
    base_url: String,
    status_url: String,
    retry_count: u32,
    retry_interval: Duration,
}

#[derive(Serialize)]
struct StatusPayload<'a> {
    status: &'a str,
}

impl CloudTransport {
    pub fn new(base_url: impl Into<String>, status_url: impl Into<String>, retry_count: u32, retry_interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            status_url: status_url.into(),
            retry_count,
            retry_interval,
        }
    }
}

#[async_trait]
impl Transport for CloudTransport {
    async fn upload(&self, path: &Path, fingerprint: &str) -> Result<u64, TransportError> {
        let body = tokio::fs::read(path)
            .await
            .map_err(|source| TransportError::Io { path: path.to_path_buf(), source })?;
        let len = body.len() as u64;
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), fingerprint);

        with_backoff(self.retry_count, self.retry_interval, || {
            let body = body.clone();
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .put(&url)
                    .body(body)
                    .send()
                    .await
                    .map_err(|e| TransportError::Http { reason: e.to_string() })?;
                if response.status().is_success() {
                    Ok(())
                } else {
                    Err(TransportError::Http { reason: format!("upload returned {}", response.status()) })
                }
            }
        })
        .await?;
        Ok(len)
    }

    async fn send_update(&self, status: TransportStatus) -> Result<(), TransportError> {
        let payload = StatusPayload { status: status.as_str() };
        with_backoff(self.retry_count, self.retry_interval, || async {
            let response = self
                .client
                .post(&self.status_url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| TransportError::Http { reason: e.to_string() })?;
            if response.status().is_success() {
                Ok(())
            } else {
                Err(TransportError::Http { reason: format!("status update returned {}", response.status()) })
            }
        })
        .await
    }

    fn status_url(&self) -> Option<String> {
        Some(self.status_url.clone())
    }
}
