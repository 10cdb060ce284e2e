//! Backoff schedule for status polling.
//!
//! Polling starts fast so short jobs return promptly, then slows down to
//! keep request volume low during the usual ~2 minute generation.

use std::time::Duration;

/// Tunable parameters for the polling backoff.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the second status request.
    pub initial_delay: Duration,
    /// Upper bound on the delay between status requests.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each non-terminal status.
    pub multiplier: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            multiplier: 1.5,
        }
    }
}

/// Calculate the next poll delay from the current delay and config.
///
/// The result is clamped to [`PollConfig::max_delay`].
pub fn next_delay(current: Duration, config: &PollConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}
