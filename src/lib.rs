//! brickbot - control layer for two-wheeled robots on a brick-based kit
//!
//! Mission scripts talk to one [`Robot`]. It turns declarative motion
//! intents ([`MotionRequest`]) into coordinated, cancellable motor commands.
//! It also binds sensors and runs the light and sound calibration procedures.
//!
//! The brick link and the raw motor/sensor drivers are consumed through the
//! capability traits in [`drivers`]; [`devices::mock`] provides an in-memory
//! brick for tests and rehearsal.
//!
//! # Example
//!
//! ```
//! use brickbot::devices::mock::{MockBrick, MockLocator};
//! use brickbot::{BrickbotConfig, MotionRequest, MotorPort, Robot, SensorPort};
//!
//! # fn main() -> brickbot::Result<()> {
//! let brick = MockBrick::shared();
//! brick.set_pressed(true);
//!
//! let mut robot = Robot::connect(&MockLocator::new(brick), BrickbotConfig::default())?;
//! robot.init_drive(MotorPort::A, MotorPort::C)?;
//! let bumper = robot.init_touch_sensor(SensorPort::S1)?;
//!
//! // Drive until the bumper is pressed, blocking until then
//! robot.move_forward(MotionRequest::until(move || bumper.is_pressed()).wait())?;
//! assert!(!robot.running());
//! # Ok(())
//! # }
//! ```

pub mod actuators;
pub mod calibration;
pub mod config;
pub mod core;
pub mod devices;
pub mod drivers;
pub mod error;
pub mod morse;
pub mod motion;
pub mod robot;
pub mod route;
pub mod sensors;
pub mod util;

pub use config::BrickbotConfig;
pub use crate::core::types::{
    CalibrationBounds, Illumination, MotorPort, SensorKind, SensorPort, ServoPosition,
};
pub use error::{Error, Result};
pub use motion::{MotionRequest, StopHandle, Termination};
pub use robot::Robot;
pub use route::{Movement, Route};
pub use util::normalize;

pub const SERVO_UP: ServoPosition = ServoPosition::Up;
pub const SERVO_DOWN: ServoPosition = ServoPosition::Down;
pub const SERVO_NICE: ServoPosition = ServoPosition::Nice;

pub const ON: Illumination = Illumination::On;
pub const OFF: Illumination = Illumination::Off;
