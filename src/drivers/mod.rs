//! Capability traits consumed from the hardware binding layer
//!
//! The brick link, motor and sensor drivers live outside this crate; the
//! robot only talks to them through these traits.

pub mod brick;
pub mod motor;
pub mod sensors;
pub mod tone;

pub use brick::{Brick, BrickLocator};
pub use motor::{Motor, SharedMotor};
pub use sensors::{LightSensor, SoundSensor, TouchSensor, UltrasonicSensor};
pub use tone::ToneDevice;
