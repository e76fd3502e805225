//! Typed sensor handles

use crate::core::types::{Illumination, SensorPort};
use crate::drivers::{Brick, LightSensor, SoundSensor, TouchSensor, UltrasonicSensor};
use crate::error::Result;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Light sensor bound to a port
#[derive(Clone)]
pub struct LightHandle {
    sensor: Arc<Mutex<Box<dyn LightSensor>>>,
    port: SensorPort,
}

impl LightHandle {
    pub fn new(sensor: Box<dyn LightSensor>, port: SensorPort) -> Self {
        Self {
            sensor: Arc::new(Mutex::new(sensor)),
            port,
        }
    }

    /// Open the sensor on `port` and bind it
    pub fn open(brick: &dyn Brick, port: SensorPort) -> Result<Self> {
        Ok(Self::new(brick.open_light(port)?, port))
    }

    pub fn port(&self) -> SensorPort {
        self.port
    }

    pub fn lightness(&self) -> Result<u16> {
        self.sensor.lock().lightness()
    }

    pub fn set_illuminated(&self, state: Illumination) -> Result<()> {
        log::debug!("Light sensor on {}: LED {:?}", self.port, state);
        self.sensor.lock().set_illuminated(state.into())
    }
}

/// Sound sensor bound to a port
#[derive(Clone)]
pub struct SoundHandle {
    sensor: Arc<Mutex<Box<dyn SoundSensor>>>,
    port: SensorPort,
}

impl SoundHandle {
    pub fn new(sensor: Box<dyn SoundSensor>, port: SensorPort) -> Self {
        Self {
            sensor: Arc::new(Mutex::new(sensor)),
            port,
        }
    }

    pub fn open(brick: &dyn Brick, port: SensorPort) -> Result<Self> {
        Ok(Self::new(brick.open_sound(port)?, port))
    }

    pub fn port(&self) -> SensorPort {
        self.port
    }

    pub fn sample(&self) -> Result<u16> {
        self.sensor.lock().sample()
    }
}

/// Touch sensor bound to a port
#[derive(Clone)]
pub struct TouchHandle {
    sensor: Arc<Mutex<Box<dyn TouchSensor>>>,
    port: SensorPort,
}

impl TouchHandle {
    pub fn new(sensor: Box<dyn TouchSensor>, port: SensorPort) -> Self {
        Self {
            sensor: Arc::new(Mutex::new(sensor)),
            port,
        }
    }

    pub fn open(brick: &dyn Brick, port: SensorPort) -> Result<Self> {
        Ok(Self::new(brick.open_touch(port)?, port))
    }

    pub fn port(&self) -> SensorPort {
        self.port
    }

    pub fn is_pressed(&self) -> Result<bool> {
        self.sensor.lock().is_pressed()
    }
}

/// Ultrasonic sensor bound to a port
#[derive(Clone)]
pub struct UltrasonicHandle {
    sensor: Arc<Mutex<Box<dyn UltrasonicSensor>>>,
    port: SensorPort,
}

impl UltrasonicHandle {
    pub fn new(sensor: Box<dyn UltrasonicSensor>, port: SensorPort) -> Self {
        Self {
            sensor: Arc::new(Mutex::new(sensor)),
            port,
        }
    }

    pub fn open(brick: &dyn Brick, port: SensorPort) -> Result<Self> {
        Ok(Self::new(brick.open_ultrasonic(port)?, port))
    }

    pub fn port(&self) -> SensorPort {
        self.port
    }

    /// Distance in centimeters
    pub fn distance(&self) -> Result<u8> {
        self.sensor.lock().distance()
    }
}

impl fmt::Debug for LightHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightHandle").field("port", &self.port).finish()
    }
}

impl fmt::Debug for SoundHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundHandle").field("port", &self.port).finish()
    }
}

impl fmt::Debug for TouchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TouchHandle").field("port", &self.port).finish()
    }
}

impl fmt::Debug for UltrasonicHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UltrasonicHandle")
            .field("port", &self.port)
            .finish()
    }
}
