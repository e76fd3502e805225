//! Mock motor driver

use super::journal::{Actuator, Journal, MockEvent};
use super::MockSettings;
use crate::drivers::Motor;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;

/// Mock motor or synchronized pair; records every command in the journal
pub struct MockMotor {
    actuator: Actuator,
    journal: Journal,
    settings: Arc<Mutex<MockSettings>>,
}

impl MockMotor {
    pub(super) fn new(
        actuator: Actuator,
        journal: Journal,
        settings: Arc<Mutex<MockSettings>>,
    ) -> Self {
        Self {
            actuator,
            journal,
            settings,
        }
    }

    fn check_faulted(&self) -> Result<()> {
        let settings = self.settings.lock();
        if let Some(port) = settings
            .faulted
            .iter()
            .find(|p| self.actuator.involves(**p))
        {
            return Err(Error::Hardware(format!("motor on {} not responding", port)));
        }
        Ok(())
    }
}

impl Motor for MockMotor {
    fn run(&mut self, power: i8) -> Result<()> {
        self.check_faulted()?;
        self.journal.record(MockEvent::Run {
            actuator: self.actuator,
            power,
        });
        Ok(())
    }

    fn idle(&mut self) -> Result<()> {
        self.check_faulted()?;
        self.journal.record(MockEvent::Idle {
            actuator: self.actuator,
        });
        Ok(())
    }

    fn brake(&mut self) -> Result<()> {
        self.check_faulted()?;
        self.journal.record(MockEvent::Brake {
            actuator: self.actuator,
        });
        Ok(())
    }

    fn turn(&mut self, power: i8, degrees: f64) -> Result<()> {
        self.check_faulted()?;
        self.journal.record(MockEvent::TurnStarted {
            actuator: self.actuator,
            power,
            degrees,
        });

        let (duration, jammed) = {
            let settings = self.settings.lock();
            let jammed = settings
                .jammed
                .iter()
                .find(|p| self.actuator.involves(**p))
                .copied();
            (settings.turn_duration, jammed)
        };

        // Release the settings lock before sleeping so concurrent turns overlap
        thread::sleep(duration);

        if let Some(port) = jammed {
            self.journal.record(MockEvent::TurnFailed {
                actuator: self.actuator,
            });
            return Err(Error::Hardware(format!("motor on {} is blocked", port)));
        }

        self.journal.record(MockEvent::TurnFinished {
            actuator: self.actuator,
        });
        Ok(())
    }
}
