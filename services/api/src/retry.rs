//! services/api/src/retry.rs
//!
//! Bounded retry with exponential backoff, used for the startup database connect.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Wait before retrying after failed attempt number `attempt` (1-based):
/// `base * 2^(attempt - 1)`, saturating instead of overflowing.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    base.saturating_mul(1u32 << exponent)
}

/// Runs `op` until it succeeds or `max_attempts` attempts have failed.
///
/// The error of the last attempt is returned. A `max_attempts` of zero still
/// makes one attempt.
pub async fn retry_with_backoff<T, E, F, Fut>(
    what: &str,
    max_attempts: u32,
    base: Duration,
    mut op: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                let delay = backoff_delay(base, attempt);
                warn!(
                    error = %e,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "{} failed, retrying",
                    what
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
