//! Sensor driver traits

use crate::error::Result;

/// Reflected light sensor with a switchable LED
pub trait LightSensor: Send {
    /// Raw lightness reading
    fn lightness(&mut self) -> Result<u16>;

    fn set_illuminated(&mut self, on: bool) -> Result<()>;
}

/// Microphone level sensor
pub trait SoundSensor: Send {
    /// Raw sound level sample
    fn sample(&mut self) -> Result<u16>;
}

/// Push button
pub trait TouchSensor: Send {
    fn is_pressed(&mut self) -> Result<bool>;
}

/// Ultrasonic range finder
pub trait UltrasonicSensor: Send {
    /// Distance to the nearest obstacle, in centimeters
    fn distance(&mut self) -> Result<u8>;
}
