// crates/dynform-core/src/runtime/retry.rs
// ============================================================================
// Module: Transport Retry
// Description: Bounded exponential backoff around remote transport calls.
// Purpose: Mask transient transport failures before they become validation failures.
// Dependencies: tokio, crate::interfaces, crate::runtime::events
// ============================================================================

//! ## Overview
//! [`with_backoff`] runs one transport call, retrying retryable failures up
//! to [`RetryPolicy::max_retries`] times. The delay before retry `n` is
//! `initial_interval * 2^(n-1)`, capped at `max_interval` when set. Every
//! call starts with a fresh attempt counter, so a success resets the
//! backoff for the next call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::interfaces::TransportError;
use crate::runtime::events::FormEvent;
use crate::runtime::events::FormEventSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(1);
/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Retry envelope for transport calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_interval: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Upper bound on a single delay.
    pub max_interval: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
            max_interval: None,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            initial_interval: Duration::ZERO,
            max_retries: 0,
            max_interval: None,
        }
    }

    /// Returns the delay before retry `retry` (starting at 1).
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        let delay = self.initial_interval.saturating_mul(1_u32 << exponent);
        self.max_interval.map_or(delay, |cap| delay.min(cap))
    }
}

// ============================================================================
// SECTION: Backoff
// ============================================================================

/// Runs `operation` under the retry policy.
///
/// # Errors
///
/// Returns the last [`TransportError`] once retries are exhausted, or the
/// first non-retryable one.
pub async fn with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    events: &dyn FormEventSink,
    url: &str,
    mut operation: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut retry = 0_u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && retry < policy.max_retries => {
                retry += 1;
                let delay = policy.delay_for_retry(retry);
                events.emit(FormEvent::TransportRetry {
                    url: url.to_string(),
                    attempt: retry,
                    delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error_kind: err.kind(),
                });
                sleep(delay).await;
            }
            Err(err) => {
                events.emit(FormEvent::TransportExhausted {
                    url: url.to_string(),
                    attempts: retry + 1,
                    error_kind: err.kind(),
                });
                return Err(err);
            }
        }
    }
}
