//! Retry envelope with exponential backoff, keyed on an explicit error-kind
//! taxonomy (§4.9, §7).

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Error-kind taxonomy shared by C3, C4, and C7 (§4.9, §7).
///
/// `Other` errors are never retried; they propagate to the caller
/// immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryKind {
    /// Transient network failure; always worth retrying.
    Transient,
    /// HTTP 429/5xx or a provider-side fault; retried up to the attempt
    /// bound, then treated as fatal.
    ProviderFault,
    /// The call exceeded its per-attempt timeout.
    Timeout,
    /// Fatal, non-retriable input error (e.g. malformed request).
    InvalidInput,
}

impl RetryKind {
    fn is_retriable(self) -> bool {
        matches!(self, Self::Transient | Self::ProviderFault | Self::Timeout)
    }
}

/// Implemented by error types that know which [`RetryKind`] they are, so the
/// retry envelope can decide whether another attempt is worthwhile without
/// catching a broad exception class.
pub trait Retryable {
    fn retry_kind(&self) -> RetryKind;
}

/// Retry policy: attempt bound and backoff shape (§4.9: "up to `M` attempts
/// (typical 3) with exponential backoff `b · 2^(k-1)` seconds for attempt
/// `k`, jitter optional").
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_secs(1),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_backoff: Duration, jitter: bool) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff,
            jitter,
        }
    }

    /// Backoff duration for attempt `k` (1-indexed): `base · 2^(k-1)`, with
    /// up to ±25% jitter when enabled.
    fn backoff_for_attempt(&self, k: u32) -> Duration {
        let exp = 2u32.saturating_pow(k.saturating_sub(1).min(16));
        let base = self.base_backoff.saturating_mul(exp);
        if !self.jitter {
            return base;
        }
        let jitter_frac = pseudo_jitter_fraction(k);
        let jittered_nanos = (base.as_nanos() as f64 * (0.75 + 0.5 * jitter_frac)) as u64;
        Duration::from_nanos(jittered_nanos)
    }
}

/// A small deterministic jitter source derived from the attempt number and
/// the current instant, avoiding a dependency on a random-number crate for
/// what is cosmetic backoff spreading.
fn pseudo_jitter_fraction(attempt: u32) -> f64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let mixed = nanos.wrapping_mul(2_654_435_761).wrapping_add(attempt);
    (mixed % 1000) as f64 / 1000.0
}

/// Run `op` up to `policy.max_attempts` times, retrying only errors whose
/// [`Retryable::retry_kind`] is retriable, sleeping with exponential backoff
/// between attempts.
///
/// Returns the last error once attempts are exhausted, or immediately on
/// the first non-retriable error.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: Retryable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let kind = err.retry_kind();
                if !kind.is_retriable() || attempt >= policy.max_attempts {
                    return Err(err);
                }
                let backoff = policy.backoff_for_attempt(attempt);
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    backoff_ms = backoff.as_millis(),
                    "retriable error, backing off before next attempt"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}
