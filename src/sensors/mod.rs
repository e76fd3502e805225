//! Sensor bindings
//!
//! One cloneable handle type per [`SensorKind`], plus [`SensorHandle`], the
//! tagged union returned by the generic `Robot::init_sensor`. Handles are
//! `Send + Sync`, so until-predicates running on the motion worker can read
//! them directly.

mod handles;

pub use handles::{LightHandle, SoundHandle, TouchHandle, UltrasonicHandle};

use crate::core::types::{SensorKind, SensorPort};
use crate::drivers::Brick;
use crate::error::Result;

/// A bound sensor of any supported kind
#[derive(Debug, Clone)]
pub enum SensorHandle {
    Light(LightHandle),
    Sound(SoundHandle),
    Touch(TouchHandle),
    Ultrasonic(UltrasonicHandle),
}

impl SensorHandle {
    /// Bind a new handle of `kind` to `port`
    pub fn open(brick: &dyn Brick, kind: SensorKind, port: SensorPort) -> Result<Self> {
        log::debug!("Initializing sensor {} at port {}", kind, port);
        let handle = match kind {
            SensorKind::Light => Self::Light(LightHandle::open(brick, port)?),
            SensorKind::Sound => Self::Sound(SoundHandle::open(brick, port)?),
            SensorKind::Touch => Self::Touch(TouchHandle::open(brick, port)?),
            SensorKind::Ultrasonic => Self::Ultrasonic(UltrasonicHandle::open(brick, port)?),
        };
        Ok(handle)
    }

    pub fn kind(&self) -> SensorKind {
        match self {
            Self::Light(_) => SensorKind::Light,
            Self::Sound(_) => SensorKind::Sound,
            Self::Touch(_) => SensorKind::Touch,
            Self::Ultrasonic(_) => SensorKind::Ultrasonic,
        }
    }

    pub fn port(&self) -> SensorPort {
        match self {
            Self::Light(h) => h.port(),
            Self::Sound(h) => h.port(),
            Self::Touch(h) => h.port(),
            Self::Ultrasonic(h) => h.port(),
        }
    }

    pub fn as_light(&self) -> Option<&LightHandle> {
        match self {
            Self::Light(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_sound(&self) -> Option<&SoundHandle> {
        match self {
            Self::Sound(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_touch(&self) -> Option<&TouchHandle> {
        match self {
            Self::Touch(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_ultrasonic(&self) -> Option<&UltrasonicHandle> {
        match self {
            Self::Ultrasonic(h) => Some(h),
            _ => None,
        }
    }
}
