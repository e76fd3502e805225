//! Command journal shared by all mock devices of one brick

use crate::core::types::MotorPort;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// What a motor command was addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    Single(MotorPort),
    Pair(MotorPort, MotorPort),
}

impl Actuator {
    pub fn involves(&self, port: MotorPort) -> bool {
        match *self {
            Self::Single(p) => p == port,
            Self::Pair(a, b) => a == port || b == port,
        }
    }
}

/// One recorded hardware command
#[derive(Debug, Clone, PartialEq)]
pub enum MockEvent {
    Run { actuator: Actuator, power: i8 },
    Idle { actuator: Actuator },
    Brake { actuator: Actuator },
    TurnStarted { actuator: Actuator, power: i8, degrees: f64 },
    TurnFinished { actuator: Actuator },
    TurnFailed { actuator: Actuator },
    Tone { frequency_hz: u16, duration: Duration },
    Illuminated(bool),
}

impl MockEvent {
    pub fn is_motor_command(&self) -> bool {
        !matches!(self, Self::Tone { .. } | Self::Illuminated(_))
    }
}

/// Ordered, thread-safe list of [`MockEvent`]s
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<MockEvent>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: MockEvent) {
        log::trace!("mock: {:?}", event);
        self.events.lock().push(event);
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<MockEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// `(actuator, power, degrees)` of every turn started
    pub fn turns(&self) -> Vec<(Actuator, i8, f64)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match *e {
                MockEvent::TurnStarted {
                    actuator,
                    power,
                    degrees,
                } => Some((actuator, power, degrees)),
                _ => None,
            })
            .collect()
    }

    /// `(actuator, power)` of every run command
    pub fn runs(&self) -> Vec<(Actuator, i8)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match *e {
                MockEvent::Run { actuator, power } => Some((actuator, power)),
                _ => None,
            })
            .collect()
    }

    pub fn motor_command_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.is_motor_command())
            .count()
    }

    pub fn tones(&self) -> Vec<(u16, Duration)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match *e {
                MockEvent::Tone {
                    frequency_hz,
                    duration,
                } => Some((frequency_hz, duration)),
                _ => None,
            })
            .collect()
    }
}
