//! Core data types shared by the robot, its bindings and the capability traits.

use crate::error::Result;
use crate::util::normalize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Motor output ports on the brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorPort {
    A,
    B,
    C,
}

/// Sensor input ports on the brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorPort {
    S1,
    S2,
    S3,
    S4,
}

impl fmt::Display for MotorPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        };
        write!(f, "PORT_{}", name)
    }
}

impl fmt::Display for SensorPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = match self {
            Self::S1 => 1,
            Self::S2 => 2,
            Self::S3 => 3,
            Self::S4 => 4,
        };
        write!(f, "PORT_{}", index)
    }
}

/// Sensor kinds the robot knows how to bind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    Light,
    Sound,
    Touch,
    Ultrasonic,
}

impl SensorKind {
    /// Fixed registry of supported kinds
    pub const ALL: [SensorKind; 4] = [Self::Light, Self::Sound, Self::Touch, Self::Ultrasonic];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Sound => "sound",
            Self::Touch => "touch",
            Self::Ultrasonic => "ultrasonic",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named servo positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServoPosition {
    Up,
    Down,
    /// Up followed by Down, a single flourish
    Nice,
}

impl ServoPosition {
    pub fn includes_up(&self) -> bool {
        matches!(self, Self::Up | Self::Nice)
    }

    pub fn includes_down(&self) -> bool {
        matches!(self, Self::Down | Self::Nice)
    }
}

/// Light sensor LED state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Illumination {
    On,
    Off,
}

impl From<Illumination> for bool {
    fn from(state: Illumination) -> bool {
        state == Illumination::On
    }
}

/// Raw reading pair defining a sensor's normalization range.
///
/// `high > low` is expected but not enforced; equal bounds are reported when
/// normalizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBounds {
    pub low: f64,
    pub high: f64,
}

impl CalibrationBounds {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Normalize a raw reading into this range (not clamped)
    pub fn normalize(&self, value: f64) -> Result<f64> {
        normalize(value, self.low, self.high)
    }

    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_display() {
        assert_eq!(MotorPort::A.to_string(), "PORT_A");
        assert_eq!(SensorPort::S4.to_string(), "PORT_4");
    }

    #[test]
    fn test_sensor_registry() {
        let names: Vec<_> = SensorKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, ["light", "sound", "touch", "ultrasonic"]);
    }

    #[test]
    fn test_servo_position_sub_moves() {
        assert!(ServoPosition::Up.includes_up());
        assert!(!ServoPosition::Up.includes_down());
        assert!(ServoPosition::Nice.includes_up() && ServoPosition::Nice.includes_down());
    }

    #[test]
    fn test_bounds_normalize() {
        let bounds = CalibrationBounds::new(229.0, 900.0);
        assert_eq!(bounds.normalize(229.0).unwrap(), 0.0);
        assert_eq!(bounds.normalize(900.0).unwrap(), 1.0);
        assert!(CalibrationBounds::new(5.0, 5.0).normalize(5.0).is_err());
    }
}
