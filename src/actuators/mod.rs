//! Actuator bindings: the synchronized drive and the servo

pub mod drive;
pub mod servo;

pub use drive::DriveUnit;
pub use servo::Servo;
