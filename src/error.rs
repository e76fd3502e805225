//! Error types for brickbot

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Brickbot error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Robot has no hardware link to a brick
    #[error("No brick connected")]
    NotConnected,

    /// Brick locator could not find a brick
    #[error("Brick not found")]
    BrickNotFound,

    /// Component was never bound to the robot
    #[error("Component not initialized: {0}")]
    NotInitialized(&'static str),

    /// Invalid parameter or conflicting request
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A motion is already in progress
    #[error("Robot is busy with another motion")]
    Busy,

    /// Normalization range with equal bounds
    #[error("Degenerate range: low={low}, high={high}")]
    DegenerateRange {
        /// Lower bound
        low: f64,
        /// Upper bound
        high: f64,
    },

    /// Calibration window produced no usable samples
    #[error("Calibration window produced no samples: {0}")]
    EmptyCalibrationWindow(&'static str),

    /// Failure reported by a motor, sensor or the brick itself
    #[error("Hardware error: {0}")]
    Hardware(String),

    /// Motion worker thread panicked
    #[error("Motion worker panicked")]
    WorkerPanicked,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be serialized
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// True for errors raised by request validation, before any hardware I/O
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::NotInitialized(_)
                | Self::InvalidParameter(_)
                | Self::Busy
                | Self::DegenerateRange { .. }
                | Self::EmptyCalibrationWindow(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_configuration() {
        assert!(Error::Busy.is_configuration());
        assert!(Error::NotInitialized("drive").is_configuration());
        assert!(Error::InvalidParameter("power".into()).is_configuration());
        assert!(
            Error::DegenerateRange {
                low: 40.0,
                high: 40.0
            }
            .is_configuration()
        );
    }

    #[test]
    fn test_runtime_errors_are_not_configuration() {
        assert!(!Error::Hardware("motor on A not responding".into()).is_configuration());
        assert!(!Error::WorkerPanicked.is_configuration());
        assert!(!Error::Io(std::io::Error::other("link lost")).is_configuration());
    }
}
