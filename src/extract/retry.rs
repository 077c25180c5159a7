//! Retry with exponential backoff for extraction network calls.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::ExtractError;

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default delay before the first retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
/// Default ceiling on the delay between attempts.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);
/// Default per-attempt timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Fraction of the backoff delay added as random jitter.
const JITTER_FACTOR: f64 = 0.25;

/// Retry policy for extraction requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial attempt (3 retries = 4 attempts total).
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub initial_delay: Duration,
    /// Ceiling on the computed delay, applied before jitter.
    pub max_delay: Duration,
    /// Per-attempt timeout.
    pub request_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Compute the backoff delay for a retry (0-based).
///
/// Exponential doubling capped at `max_delay`, plus up to 25% random jitter
/// so clients that failed together don't retry in lockstep.
fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.initial_delay.as_millis() as u64;
    let exponential = base.saturating_mul(2u64.saturating_pow(attempt));
    let capped = exponential.min(config.max_delay.as_millis() as u64);
    let jitter = (capped as f64 * rand::thread_rng().gen_range(0.0..=JITTER_FACTOR)) as u64;
    Duration::from_millis(capped + jitter)
}

/// Run `operation`, retrying retryable failures with exponential backoff.
///
/// Each attempt is bounded by the per-attempt timeout; hitting it counts as
/// a retryable `Timeout`. Terminal errors abort immediately. Attempts run
/// strictly sequentially; the error from the final attempt is returned.
pub async fn retry_with_backoff<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, ExtractError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExtractError>>,
{
    let mut attempt: u32 = 0;
    loop {
        let result = match tokio::time::timeout(config.request_timeout, operation()).await {
            Ok(result) => result,
            Err(_) => Err(ExtractError::Timeout(format!(
                "{} produced no response within {:?}",
                operation_name, config.request_timeout
            ))),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(err) if err.retryable() && attempt < config.max_retries => {
                let delay = backoff_delay(config, attempt);
                tracing::warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::debug!(
                    operation = operation_name,
                    attempts = attempt + 1,
                    kind = err.kind().as_str(),
                    "giving up"
                );
                return Err(err);
            }
        }
    }
}
