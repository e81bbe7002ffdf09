use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;

/// Retry `call` up to `retry_count` additional times, sleeping
/// `retry_interval` between attempts. Shared by every [`crate::Transport`]
/// implementation rather than duplicated per backend.
pub async fn with_backoff<T, F, Fut>(
    retry_count: u32,
    retry_interval: Duration,
    mut call: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt > retry_count {
                    tracing::warn!(attempts = attempt, %err, "transport call exhausted retries");
                    return Err(TransportError::RetriesExhausted { attempts: attempt });
                }
                tracing::debug!(attempt, %err, "transport call failed, retrying");
                tokio::time::sleep(retry_interval).await;
            }
        }
    }
}
