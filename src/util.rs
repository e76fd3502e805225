//! Normalization and deadline helpers.

use crate::error::{Error, Result};
use std::time::{Duration, Instant};

/// Map a raw reading into the calibrated range: `(value - low) / (high - low)`.
///
/// The result is not clamped. A live reading outside the calibrated range
/// yields a value below 0 or above 1, which is how sensor drift shows up.
///
/// Fails with [`Error::DegenerateRange`] when `high == low` or when the inputs
/// are not finite.
pub fn normalize(value: f64, low: f64, high: f64) -> Result<f64> {
    let span = high - low;
    if span == 0.0 || !span.is_finite() {
        return Err(Error::DegenerateRange { low, high });
    }
    let normalized = (value - low) / span;
    if !normalized.is_finite() {
        return Err(Error::DegenerateRange { low, high });
    }
    Ok(normalized)
}

/// True once `duration` has elapsed since `start`
pub fn countdown(start: Instant, duration: Duration) -> bool {
    start.elapsed() >= duration
}

/// Deadline predicate used for timed motion
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    start: Instant,
    duration: Duration,
}

impl Countdown {
    /// Start counting down from now
    pub fn start(duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            duration,
        }
    }

    pub fn expired(&self) -> bool {
        countdown(self.start, self.duration)
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.start.elapsed())
    }
}
