//! Simulated remote-call latency for the in-memory backends.
//!
//! DESIGN
//! ======
//! The mock directory and profile repository stand in for a network backend,
//! so every operation first awaits a configurable delay: a fixed base plus
//! optional random jitter. Tests use `Latency::none()` to skip the sleep.

use std::time::Duration;

use rand::Rng;

const DEFAULT_LATENCY_MS: u64 = 500;
const DEFAULT_JITTER_MS: u64 = 0;

/// Parse an environment variable, falling back to a default on absence or
/// parse failure.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Simulated latency: `base` plus a uniform random delay in `0..=jitter`.
#[derive(Debug, Clone, Copy)]
pub struct Latency {
    base: Duration,
    jitter: Duration,
}

impl Latency {
    #[must_use]
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// Fixed delay with no jitter.
    #[must_use]
    pub fn fixed(base: Duration) -> Self {
        Self::new(base, Duration::ZERO)
    }

    /// No delay at all. Mock operations complete at the next await point.
    #[must_use]
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Load from `MOCK_LATENCY_MS` (default 500) and `MOCK_LATENCY_JITTER_MS`
    /// (default 0).
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            Duration::from_millis(env_parse("MOCK_LATENCY_MS", DEFAULT_LATENCY_MS)),
            Duration::from_millis(env_parse("MOCK_LATENCY_JITTER_MS", DEFAULT_JITTER_MS)),
        )
    }

    /// Sleep for the configured delay.
    pub async fn simulate(&self) {
        let mut delay = self.base;
        if !self.jitter.is_zero() {
            let jitter_ms = rand::rng().random_range(0..=self.jitter.as_millis() as u64);
            delay += Duration::from_millis(jitter_ms);
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
#[path = "latency_test.rs"]
mod tests;
