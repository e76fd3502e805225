//! Motion engine
//!
//! - [`request`]: declarative motion intents ([`MotionRequest`], [`Termination`])
//! - [`state`]: the shared running flag and stop epoch ([`RunState`])
//! - [`worker`]: the until-loop run on a background thread
//!
//! # Run/stop contract
//!
//! ```text
//!  caller thread                     motion-worker thread
//!  ─────────────                     ────────────────────
//!  begin()   running=true, epoch+1
//!  spawn ──────────────────────────▶ drive.run(power)
//!                                    loop {
//!                                      predicate()? ── true ──▶ halt, running=false
//!                                      wait ≤ poll_interval
//!  stop()    idle, epoch+1,  ───────▶    (woken, epoch changed) ──▶ exit
//!            running=false           }
//! ```
//!
//! The running flag is the only locked state. Every `stop()` bumps the stop
//! epoch, which is how a polling worker learns it was stopped from outside,
//! even when its predicate never becomes true.

pub mod request;
pub mod state;
pub(crate) mod worker;

pub use request::{Direction, MotionRequest, Predicate, Termination};
pub use state::{RunState, StopHandle};

use crate::error::{Error, Result};

/// Check a power magnitude (1..=100)
pub fn validate_magnitude(power: i8) -> Result<i8> {
    if (1..=100).contains(&power) {
        Ok(power)
    } else {
        Err(Error::InvalidParameter(format!(
            "power must be a magnitude in 1..=100, got {}",
            power
        )))
    }
}

/// Check a signed power (-100..=100, non-zero)
pub fn validate_signed(power: i8) -> Result<i8> {
    if power != 0 && (-100..=100).contains(&power) {
        Ok(power)
    } else {
        Err(Error::InvalidParameter(format!(
            "power must be non-zero within -100..=100, got {}",
            power
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_magnitude() {
        assert_eq!(validate_magnitude(1).unwrap(), 1);
        assert_eq!(validate_magnitude(100).unwrap(), 100);
        for p in [0, -1, -100, 101, i8::MIN, i8::MAX] {
            assert!(validate_magnitude(p).is_err(), "power {} accepted", p);
        }
    }

    #[test]
    fn test_validate_signed() {
        assert!(validate_signed(-20).is_ok());
        assert!(validate_signed(8).is_ok());
        assert!(validate_signed(0).is_err());
        assert!(validate_signed(-101).is_err());
    }
}
