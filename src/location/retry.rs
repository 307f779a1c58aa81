//! Fixed-delay retry for geocoding lookups.
//!
//! [`retry_with_fixed_delay`] runs an operation up to `max_attempts` times.
//! Transport failures and non-2xx statuses are retried after a constant
//! pause; anything else is returned at once. The pause goes through a
//! [`Sleeper`] so tests never wait on the wall clock.

use std::time::Duration;

use super::types::LookupError;

/// Something that can block the current thread for a while.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// The production sleeper: `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Attempt budget and the pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

pub(crate) fn is_retriable(err: &LookupError) -> bool {
    matches!(err, LookupError::Transport(_) | LookupError::Status { .. })
}

/// Run `operation` until it succeeds, fails non-retriably, or the budget runs out.
///
/// No sleep follows the final attempt. On exhaustion the last error is
/// wrapped in [`LookupError::Exhausted`] along with `location` and the
/// number of attempts made.
pub fn retry_with_fixed_delay<T, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    location: &str,
    mut operation: F,
) -> Result<T, LookupError>
where
    F: FnMut() -> Result<T, LookupError>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let err = match operation() {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) => return Err(err),
            Err(err) => err,
        };

        if attempt >= max_attempts {
            tracing::error!(location, attempts = attempt, error = %err, "geocoding lookup failed");
            return Err(LookupError::Exhausted {
                location: location.to_string(),
                attempts: attempt,
                source: Box::new(err),
            });
        }

        tracing::warn!(
            location,
            attempt,
            max_attempts,
            delay_ms = policy.delay.as_millis() as u64,
            error = %err,
            "transient geocoding error, retrying"
        );
        sleeper.sleep(policy.delay);
    }
}
