//! Two drive motors bound as one logical unit

use crate::core::types::MotorPort;
use crate::drivers::{Brick, Motor, SharedMotor};
use crate::error::Result;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Left and right drive motors
///
/// Straight motion goes through the synchronized pair; turns and spins drive
/// the wheels individually. Cloning shares the same underlying handles.
#[derive(Clone)]
pub struct DriveUnit {
    pair: SharedMotor,
    left: SharedMotor,
    right: SharedMotor,
    ports: (MotorPort, MotorPort),
}

impl DriveUnit {
    /// Open the pair and both wheels on `brick`
    pub fn open(brick: &dyn Brick, left: MotorPort, right: MotorPort) -> Result<Self> {
        let pair = brick.open_synchronized(left, right)?;
        let left_motor = brick.open_motor(left)?;
        let right_motor = brick.open_motor(right)?;

        Ok(Self {
            pair: Arc::new(Mutex::new(pair)),
            left: Arc::new(Mutex::new(left_motor)),
            right: Arc::new(Mutex::new(right_motor)),
            ports: (left, right),
        })
    }

    /// (left, right) ports
    pub fn ports(&self) -> (MotorPort, MotorPort) {
        self.ports
    }

    pub fn run(&self, power: i8) -> Result<()> {
        log::trace!("Drive: run power={}", power);
        self.pair.lock().run(power)
    }

    pub fn idle(&self) -> Result<()> {
        log::trace!("Drive: idle");
        self.pair.lock().idle()
    }

    pub fn brake(&self) -> Result<()> {
        log::trace!("Drive: brake");
        self.pair.lock().brake()
    }

    /// Idle, then brake if asked
    pub fn halt(&self, brake: bool) -> Result<()> {
        self.idle()?;
        if brake {
            self.brake()?;
        }
        Ok(())
    }

    /// Exclusive access to the synchronized pair until the guard drops.
    /// Blocking pair turns go through here so callers can order them against
    /// a stop.
    pub(crate) fn lock_pair(&self) -> MutexGuard<'_, Box<dyn Motor>> {
        self.pair.lock()
    }

    pub fn left(&self) -> &SharedMotor {
        &self.left
    }

    pub fn right(&self) -> &SharedMotor {
        &self.right
    }
}

impl std::fmt::Debug for DriveUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveUnit")
            .field("left", &self.ports.0)
            .field("right", &self.ports.1)
            .finish()
    }
}
