//! Retry backoff arithmetic.
//!
//! Pure delay calculation for the retry wrapper in sync-client. The
//! coordinator itself never retries; this is a separate policy layered on
//! top of the transport.

use std::time::Duration;

/// Calculate the delay before retry attempt `attempt` (1-based).
///
/// Uses exponential backoff with random jitter to avoid synchronized
/// retry storms when many devices lose connectivity at once.
///
/// Formula: `min(max_delay, base_delay * 2^(attempt-1)) + random(0..=delay/4)`
pub fn backoff_delay(base_delay: Duration, max_delay: Duration, attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    let delay = base_delay.saturating_mul(1u32 << exp).min(max_delay);

    delay + jitter(delay / 4)
}

/// Generate a random duration in `0..=max`.
fn jitter(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }

    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes).expect("getrandom failed");
    let random = u64::from_le_bytes(bytes);

    Duration::from_millis(random % (max_ms + 1))
}
