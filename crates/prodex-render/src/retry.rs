//! Exponential backoff with jitter for transient fetch failures.
//!
//! Rate limiting (429), server errors (5xx), timeouts and connection failures
//! are retried. Everything else (404, other 4xx, bad URLs) is returned on the
//! first occurrence.

use std::future::Future;
use std::time::Duration;

use crate::error::RenderError;

/// Upper bound for a single backoff sleep.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` if `err` represents a transient condition worth retrying.
pub(crate) fn is_retriable(err: &RenderError) -> bool {
    match err {
        RenderError::RateLimited { .. } | RenderError::Timeout { .. } => true,
        RenderError::UnexpectedStatus { status, .. } => *status >= 500,
        RenderError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        RenderError::InvalidUrl { .. } | RenderError::NotFound { .. } => false,
    }
}

/// Runs `operation`, retrying transient errors up to `max_retries` more times.
///
/// The n-th retry sleeps `backoff_base_ms * 2^(n-1)` milliseconds, jittered by
/// ±25 % and capped at 30 s. With `max_retries = 2` the operation runs at most
/// three times. The last error is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, RenderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RenderError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient render error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
