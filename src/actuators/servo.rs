//! Servo motor binding

use crate::config::ServoConfig;
use crate::core::types::{MotorPort, ServoPosition};
use crate::drivers::{Brick, SharedMotor};
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Independent motor used as a servo arm
#[derive(Clone)]
pub struct Servo {
    motor: SharedMotor,
    port: MotorPort,
}

impl Servo {
    pub fn open(brick: &dyn Brick, port: MotorPort) -> Result<Self> {
        let motor = brick.open_motor(port)?;
        Ok(Self {
            motor: Arc::new(Mutex::new(motor)),
            port,
        })
    }

    pub fn port(&self) -> MotorPort {
        self.port
    }

    pub fn turn(&self, power: i8, degrees: f64) -> Result<()> {
        self.motor.lock().turn(power, degrees)
    }

    /// Move to a named position.
    ///
    /// The mechanism can jam against its end stops, so a failing sub-move is
    /// logged and skipped; it never prevents the other sub-move.
    pub fn set_position(&self, position: ServoPosition, config: &ServoConfig) {
        log::debug!("Servo: moving to {:?}", position);

        if position.includes_up()
            && let Err(e) = self.turn(config.up_power, config.up_degrees)
        {
            log::warn!("Servo: up move on {} failed: {}", self.port, e);
        }

        if position.includes_down()
            && let Err(e) = self.turn(config.down_power, config.down_degrees)
        {
            log::warn!("Servo: down move on {} failed: {}", self.port, e);
        }
    }
}

impl std::fmt::Debug for Servo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Servo").field("port", &self.port).finish()
    }
}
