//! Configuration for brickbot
//!
//! Loads configuration from a TOML file. Every section has defaults matching
//! the stock two-wheel chassis, so a partial file (or no file) is fine.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BrickbotConfig {
    pub robot: RobotConfig,
    pub chassis: ChassisConfig,
    pub motion: MotionConfig,
    pub calibration: CalibrationConfig,
    pub servo: ServoConfig,
    pub morse: MorseConfig,
    pub logging: LoggingConfig,
}

/// Robot-wide defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Power used when a request does not carry its own (1..=100)
    pub default_power: i8,
}

/// Chassis geometry, in centimeters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChassisConfig {
    /// Wheel diameter, drives the distance to rotation conversion
    pub wheel_diameter_cm: f64,
}

/// Motion engine tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Upper bound on the wait between two predicate polls.
    ///
    /// `0` polls back to back (yielding the thread in between). The wait is
    /// cut short by `stop()`, so larger values only add predicate latency.
    pub poll_interval_ms: u64,
    /// Brake after idling when an until/timed motion completes
    pub brake_on_stop: bool,
}

/// Calibration timing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Pause before each prompt
    pub settle_ms: u64,
    /// Time the unattended operator waits after a prompt
    pub dwell_ms: u64,
    /// Length of each sound sampling window (quiet and loud)
    pub sound_window_ms: u64,
    /// Pause between two sound samples
    pub sound_sample_interval_ms: u64,
}

/// Servo sub-move parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServoConfig {
    pub up_power: i8,
    pub up_degrees: f64,
    pub down_power: i8,
    pub down_degrees: f64,
}

/// Morse playback
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MorseConfig {
    pub frequency_hz: u16,
    /// Length of one dot; dashes and gaps are multiples of it
    pub unit_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self { default_power: 50 }
    }
}

impl Default for ChassisConfig {
    fn default() -> Self {
        Self {
            wheel_diameter_cm: 15.0,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5,
            brake_on_stop: false,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            settle_ms: 500,
            dwell_ms: 4000,
            sound_window_ms: 5000,
            sound_sample_interval_ms: 10,
        }
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            up_power: -20,
            up_degrees: 180.0,
            down_power: 10,
            down_degrees: 90.0,
        }
    }
}

impl Default for MorseConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 1200,
            unit_ms: 150,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ChassisConfig {
    /// Distance covered by one full wheel rotation
    pub fn distance_per_rotation(&self) -> f64 {
        std::f64::consts::PI * self.wheel_diameter_cm
    }

    /// Wheel rotation in degrees needed to cover `distance_cm`
    pub fn degrees_for_distance(&self, distance_cm: f64) -> f64 {
        distance_cm / self.distance_per_rotation() * 360.0
    }
}

impl MotionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl CalibrationConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    pub fn sound_window(&self) -> Duration {
        Duration::from_millis(self.sound_window_ms)
    }

    pub fn sound_sample_interval(&self) -> Duration {
        Duration::from_millis(self.sound_sample_interval_ms)
    }
}

impl MorseConfig {
    pub fn unit(&self) -> Duration {
        Duration::from_millis(self.unit_ms)
    }
}

impl BrickbotConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use brickbot::config::BrickbotConfig;
    ///
    /// let config = BrickbotConfig::from_file("brickbot.toml")?;
    /// # Ok::<(), brickbot::Error>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: BrickbotConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the motion engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.robot.default_power) {
            return Err(Error::InvalidParameter(format!(
                "default_power must be in 1..=100, got {}",
                self.robot.default_power
            )));
        }
        if !(self.chassis.wheel_diameter_cm.is_finite() && self.chassis.wheel_diameter_cm > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "wheel_diameter_cm must be positive, got {}",
                self.chassis.wheel_diameter_cm
            )));
        }
        Ok(())
    }
}
