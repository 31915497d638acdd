//! Minimum presentation duration applied before a result is revealed.

use std::time::Duration;

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationPolicy {
    min: Duration,
    max: Duration,
}

impl Default for PresentationPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(Self::DEFAULT_MIN_MS),
            Duration::from_millis(Self::DEFAULT_MAX_MS),
        )
    }
}

impl PresentationPolicy {
    pub const DEFAULT_MIN_MS: u64 = 500;
    pub const DEFAULT_MAX_MS: u64 = 1000;

    /// A window given in reverse order is swapped.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Uniform draw from `[min, max]`.
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    pub async fn hold(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
