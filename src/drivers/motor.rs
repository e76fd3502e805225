//! Motor driver trait

use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Motor shared between the robot and its worker threads
pub type SharedMotor = Arc<Mutex<Box<dyn Motor>>>;

/// A single motor or a synchronized motor pair
///
/// Power is a signed percentage (-100..=100); the sign picks the direction.
pub trait Motor: Send {
    /// Start turning at `power` until told otherwise
    fn run(&mut self, power: i8) -> Result<()>;

    /// Cut power and let the motor coast
    fn idle(&mut self) -> Result<()>;

    /// Actively hold position
    fn brake(&mut self) -> Result<()>;

    /// Rotate by `degrees` at `power`, blocking until done
    fn turn(&mut self, power: i8, degrees: f64) -> Result<()>;
}
