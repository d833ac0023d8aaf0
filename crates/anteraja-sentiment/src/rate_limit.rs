//! Retry with exponential back-off for the source feed adapters.
//!
//! Only the HTTP adapters retry; the pipeline itself never does. Rate-limit
//! responses wait at least as long as the provider asked for.

use std::future::Future;
use std::time::Duration;

use crate::error::SentimentError;

/// Upper bound on a single sleep, so a bogus reset header cannot stall a run.
const MAX_DELAY_SECS: u64 = 15 * 60;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Retriable: [`SentimentError::RateLimited`], network-level
/// [`SentimentError::Http`] failures (timeout, connect), and HTTP 5xx.
/// Everything else is returned immediately.
pub(crate) fn is_retriable(err: &SentimentError) -> bool {
    match err {
        SentimentError::RateLimited { .. } => true,
        SentimentError::Http(e) => e.is_timeout() || e.is_connect(),
        SentimentError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The sleep before retry `n` is `backoff_base_secs * 2^(n-1)` with ±25 %
/// jitter, raised to the provider's `retry_after_secs` for rate limits and
/// capped at 15 minutes.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SentimentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SentimentError>>,
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
                let delay_ms = backoff_delay_ms(backoff_base_secs, attempt, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient source error; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

fn backoff_delay_ms(backoff_base_secs: u64, attempt: u32, err: &SentimentError) -> u64 {
    let base_ms = backoff_base_secs.saturating_mul(1000);
    let computed = base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (computed as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    let floor_ms = match err {
        SentimentError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    jittered.max(floor_ms).min(MAX_DELAY_SECS * 1000)
}
