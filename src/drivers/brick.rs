//! Brick link trait

use super::motor::Motor;
use super::sensors::{LightSensor, SoundSensor, TouchSensor, UltrasonicSensor};
use super::tone::ToneDevice;
use crate::core::types::{MotorPort, SensorPort};
use crate::error::Result;
use std::sync::Arc;

/// Connection to a brick
///
/// Opens driver handles bound to its ports. Each call returns a fresh handle;
/// the link itself is shared by everything opened from it.
pub trait Brick: ToneDevice {
    /// Open a single motor
    fn open_motor(&self, port: MotorPort) -> Result<Box<dyn Motor>>;

    /// Open two motors as one synchronized unit (leader, follower)
    fn open_synchronized(&self, leader: MotorPort, follower: MotorPort)
    -> Result<Box<dyn Motor>>;

    fn open_light(&self, port: SensorPort) -> Result<Box<dyn LightSensor>>;

    fn open_sound(&self, port: SensorPort) -> Result<Box<dyn SoundSensor>>;

    fn open_touch(&self, port: SensorPort) -> Result<Box<dyn TouchSensor>>;

    fn open_ultrasonic(&self, port: SensorPort) -> Result<Box<dyn UltrasonicSensor>>;
}

/// Finds a brick to talk to (USB, Bluetooth, ...)
pub trait BrickLocator {
    /// Return the first brick found, or [`crate::Error::BrickNotFound`]
    fn find_one_brick(&self, debug: bool) -> Result<Arc<dyn Brick>>;
}
