//! Movement stack for detour-and-retrace behaviours
//!
//! A [`Route`] performs movements through a [`Robot`] and remembers the ones
//! that succeeded, so the robot can later undo them in reverse order.

use crate::error::Result;
use crate::motion::MotionRequest;
use crate::robot::Robot;

/// One recorded movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    /// Straight step forward, in centimeters
    Step(f64),
    RightTurn(f64),
    LeftTurn(f64),
}

/// Caller-owned stack of movements
#[derive(Debug, Clone, Default)]
pub struct Route {
    movements: Vec<Movement>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step forward `distance_cm` at the robot's default power
    pub fn forward(&mut self, robot: &Robot, distance_cm: f64) -> Result<()> {
        robot.move_forward(MotionRequest::distance(distance_cm))?;
        self.movements.push(Movement::Step(distance_cm));
        Ok(())
    }

    pub fn turn_right(&mut self, robot: &Robot, power: i8, degrees: f64) -> Result<()> {
        robot.turn_right(power, degrees)?;
        self.movements.push(Movement::RightTurn(degrees));
        Ok(())
    }

    pub fn turn_left(&mut self, robot: &Robot, power: i8, degrees: f64) -> Result<()> {
        robot.turn_left(power, degrees)?;
        self.movements.push(Movement::LeftTurn(degrees));
        Ok(())
    }

    /// Undo every recorded movement, newest first.
    ///
    /// Steps are undone backwards at `power`; turns are mirrored at `power`.
    /// A movement is popped only once undone, so after an error the route
    /// still holds what is left to retrace.
    pub fn retrace(&mut self, robot: &Robot, power: i8) -> Result<()> {
        log::debug!("Route: retracing {} movements", self.movements.len());
        while let Some(&movement) = self.movements.last() {
            match movement {
                Movement::Step(cm) => robot.move_backward(MotionRequest::distance(cm).power(power))?,
                Movement::RightTurn(degrees) => robot.turn_left(power, degrees)?,
                Movement::LeftTurn(degrees) => robot.turn_right(power, degrees)?,
            }
            self.movements.pop();
        }
        Ok(())
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    pub fn clear(&mut self) {
        self.movements.clear();
    }
}
