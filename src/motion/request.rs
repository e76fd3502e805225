//! Motion request definitions

use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Caller-supplied termination test, polled on the motion worker.
///
/// Returning an error aborts the motion: the drive is stopped and the error
/// is reported to whoever waits on the motion.
pub type Predicate = Box<dyn FnMut() -> Result<bool> + Send + 'static>;

/// When a motion ends
pub enum Termination {
    /// Travel this many centimeters (synchronous)
    Distance(f64),
    /// Run until the predicate returns true
    Until(Predicate),
    /// Run for this many seconds
    Seconds(f64),
    /// Run until `stop()`
    Forever,
}

impl Termination {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Distance(_) => "distance",
            Self::Until(_) => "until",
            Self::Seconds(_) => "seconds",
            Self::Forever => "forever",
        }
    }
}

impl fmt::Debug for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance(cm) => write!(f, "Distance({}cm)", cm),
            Self::Until(_) => f.write_str("Until(<predicate>)"),
            Self::Seconds(s) => write!(f, "Seconds({}s)", s),
            Self::Forever => f.write_str("Forever"),
        }
    }
}

/// Travel direction; backward negates the power magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn apply(&self, magnitude: i8) -> i8 {
        match self {
            Self::Forward => magnitude,
            Self::Backward => -magnitude,
        }
    }
}

/// One motion intent
///
/// ```
/// use brickbot::motion::MotionRequest;
///
/// let step = MotionRequest::distance(15.0).power(75);
/// let timed = MotionRequest::seconds(3.0).wait();
/// # let _ = (step, timed);
/// ```
#[derive(Debug)]
pub struct MotionRequest {
    pub termination: Termination,
    /// Power magnitude; `None` uses the robot default
    pub power: Option<i8>,
    /// Block the caller until the motion completes
    pub wait: bool,
    /// Brake after idling; `None` uses `motion.brake_on_stop`
    pub brake: Option<bool>,
}

impl MotionRequest {
    pub fn new(termination: Termination) -> Self {
        Self {
            termination,
            power: None,
            wait: false,
            brake: None,
        }
    }

    pub fn distance(distance_cm: f64) -> Self {
        Self::new(Termination::Distance(distance_cm))
    }

    pub fn until<F>(predicate: F) -> Self
    where
        F: FnMut() -> Result<bool> + Send + 'static,
    {
        Self::new(Termination::Until(Box::new(predicate)))
    }

    pub fn seconds(seconds: f64) -> Self {
        Self::new(Termination::Seconds(seconds))
    }

    pub fn for_duration(duration: Duration) -> Self {
        Self::seconds(duration.as_secs_f64())
    }

    pub fn forever() -> Self {
        Self::new(Termination::Forever)
    }

    pub fn power(mut self, power: i8) -> Self {
        self.power = Some(power);
        self
    }

    pub fn wait(mut self) -> Self {
        self.wait = true;
        self
    }

    pub fn brake(mut self, brake: bool) -> Self {
        self.brake = Some(brake);
        self
    }
}

impl Default for MotionRequest {
    fn default() -> Self {
        Self::forever()
    }
}

/// Check a distance request
pub(crate) fn validate_distance(distance_cm: f64) -> Result<f64> {
    if distance_cm.is_finite() && distance_cm > 0.0 {
        Ok(distance_cm)
    } else {
        Err(Error::InvalidParameter(format!(
            "distance must be positive, got {}",
            distance_cm
        )))
    }
}

/// Check a wheel rotation amount
pub(crate) fn validate_degrees(degrees: f64) -> Result<f64> {
    if degrees.is_finite() {
        Ok(degrees)
    } else {
        Err(Error::InvalidParameter(format!(
            "degrees must be finite, got {}",
            degrees
        )))
    }
}

/// Convert a seconds request to a duration
pub(crate) fn validate_seconds(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| Error::InvalidParameter(format!("invalid duration {}s: {}", seconds, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = MotionRequest::distance(10.0).power(75).wait().brake(true);
        assert!(matches!(request.termination, Termination::Distance(d) if d == 10.0));
        assert_eq!(request.power, Some(75));
        assert!(request.wait);
        assert_eq!(request.brake, Some(true));
    }

    #[test]
    fn test_default_is_forever() {
        let request = MotionRequest::default();
        assert_eq!(request.termination.name(), "forever");
        assert!(!request.wait);
        assert_eq!(request.power, None);
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::Forward.apply(50), 50);
        assert_eq!(Direction::Backward.apply(50), -50);
    }

    #[test]
    fn test_validation() {
        assert!(validate_distance(15.0).is_ok());
        assert!(validate_distance(0.0).is_err());
        assert!(validate_distance(-4.0).is_err());
        assert!(validate_distance(f64::NAN).is_err());

        assert!(validate_degrees(-90.0).is_ok());
        assert!(validate_degrees(f64::INFINITY).is_err());

        assert_eq!(validate_seconds(3.0).unwrap(), Duration::from_secs(3));
        assert!(validate_seconds(-1.0).is_err());
    }

    #[test]
    fn test_until_debug_hides_closure() {
        let request = MotionRequest::until(|| Ok(true));
        assert!(format!("{:?}", request).contains("Until(<predicate>)"));
    }
}
