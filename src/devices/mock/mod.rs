//! Mock brick for hardware-free testing
//!
//! Every motor command and tone lands in a shared [`Journal`] so tests can
//! assert on exactly what the robot asked the hardware to do. Sensors return
//! scripted readings: queued values first, then a steady level.
//!
//! | Component | Behaviour |
//! |-----------|-----------|
//! | Motors / pairs | Journal entry per command; `turn` sleeps `turn_duration` |
//! | Jammed port | `turn` fails after sleeping (blocked servo) |
//! | Faulted port | every command fails before touching the journal |
//! | Sensors | [`ReadingScript`] per kind, shared by all handles of that kind |
//! | Speaker | Journal entry, then sleeps the tone duration |

mod journal;
mod motor;
mod sensors;

pub use journal::{Actuator, Journal, MockEvent};
pub use motor::MockMotor;
pub use sensors::{MockLight, MockSound, MockTouch, MockUltrasonic, ReadingScript, SharedScript};

use crate::core::types::{MotorPort, SensorPort};
use crate::drivers::{
    Brick, BrickLocator, LightSensor, Motor, SoundSensor, ToneDevice, TouchSensor,
    UltrasonicSensor,
};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Fault injection and timing knobs shared with the mock motors
#[derive(Debug, Default)]
pub(crate) struct MockSettings {
    turn_duration: Duration,
    jammed: HashSet<MotorPort>,
    faulted: HashSet<MotorPort>,
}

/// In-memory brick
pub struct MockBrick {
    journal: Journal,
    settings: Arc<Mutex<MockSettings>>,
    light: SharedScript<u16>,
    sound: SharedScript<u16>,
    touch: SharedScript<bool>,
    ultrasonic: SharedScript<u8>,
    illuminated: Arc<AtomicBool>,
    tones_sleep: AtomicBool,
}

impl MockBrick {
    pub fn new() -> Self {
        Self {
            journal: Journal::new(),
            settings: Arc::new(Mutex::new(MockSettings::default())),
            light: Arc::new(Mutex::new(ReadingScript::new(0))),
            sound: Arc::new(Mutex::new(ReadingScript::new(0))),
            touch: Arc::new(Mutex::new(ReadingScript::new(false))),
            ultrasonic: Arc::new(Mutex::new(ReadingScript::new(255))),
            illuminated: Arc::new(AtomicBool::new(false)),
            tones_sleep: AtomicBool::new(true),
        }
    }

    /// Convenience for tests: a shared brick ready to hand to a robot
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// How long each `turn` blocks
    pub fn set_turn_duration(&self, duration: Duration) {
        self.settings.lock().turn_duration = duration;
    }

    /// Make turns on `port` fail, as a mechanically blocked motor would
    pub fn jam(&self, port: MotorPort) {
        self.settings.lock().jammed.insert(port);
    }

    /// Make every command on `port` fail
    pub fn fault(&self, port: MotorPort) {
        self.settings.lock().faulted.insert(port);
    }

    pub fn clear_faults(&self) {
        let mut settings = self.settings.lock();
        settings.jammed.clear();
        settings.faulted.clear();
    }

    /// Whether tones block for their duration (default true)
    pub fn set_tones_sleep(&self, sleep: bool) {
        self.tones_sleep.store(sleep, Ordering::Relaxed);
    }

    pub fn set_lightness(&self, level: u16) {
        self.light.lock().set_level(level);
    }

    pub fn queue_lightness<I: IntoIterator<Item = u16>>(&self, readings: I) {
        self.light.lock().queue(readings);
    }

    pub fn set_sound_level(&self, level: u16) {
        self.sound.lock().set_level(level);
    }

    pub fn queue_sound_samples<I: IntoIterator<Item = u16>>(&self, readings: I) {
        self.sound.lock().queue(readings);
    }

    pub fn set_pressed(&self, pressed: bool) {
        self.touch.lock().set_level(pressed);
    }

    pub fn queue_pressed<I: IntoIterator<Item = bool>>(&self, readings: I) {
        self.touch.lock().queue(readings);
    }

    pub fn set_distance(&self, distance_cm: u8) {
        self.ultrasonic.lock().set_level(distance_cm);
    }

    pub fn is_illuminated(&self) -> bool {
        self.illuminated.load(Ordering::Relaxed)
    }
}

impl Default for MockBrick {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneDevice for MockBrick {
    fn play_tone_and_wait(&self, frequency_hz: u16, duration: Duration) -> Result<()> {
        self.journal.record(MockEvent::Tone {
            frequency_hz,
            duration,
        });
        if self.tones_sleep.load(Ordering::Relaxed) {
            thread::sleep(duration);
        }
        Ok(())
    }
}

impl Brick for MockBrick {
    fn open_motor(&self, port: MotorPort) -> Result<Box<dyn Motor>> {
        log::debug!("mock: opening motor on {}", port);
        Ok(Box::new(MockMotor::new(
            Actuator::Single(port),
            self.journal.clone(),
            Arc::clone(&self.settings),
        )))
    }

    fn open_synchronized(
        &self,
        leader: MotorPort,
        follower: MotorPort,
    ) -> Result<Box<dyn Motor>> {
        if leader == follower {
            return Err(Error::InvalidParameter(format!(
                "synchronized motors need two ports, got {} twice",
                leader
            )));
        }
        log::debug!("mock: opening synchronized pair {}+{}", leader, follower);
        Ok(Box::new(MockMotor::new(
            Actuator::Pair(leader, follower),
            self.journal.clone(),
            Arc::clone(&self.settings),
        )))
    }

    fn open_light(&self, port: SensorPort) -> Result<Box<dyn LightSensor>> {
        log::debug!("mock: opening light sensor on {}", port);
        Ok(Box::new(MockLight {
            script: Arc::clone(&self.light),
            illuminated: Arc::clone(&self.illuminated),
            journal: self.journal.clone(),
        }))
    }

    fn open_sound(&self, port: SensorPort) -> Result<Box<dyn SoundSensor>> {
        log::debug!("mock: opening sound sensor on {}", port);
        Ok(Box::new(MockSound {
            script: Arc::clone(&self.sound),
        }))
    }

    fn open_touch(&self, port: SensorPort) -> Result<Box<dyn TouchSensor>> {
        log::debug!("mock: opening touch sensor on {}", port);
        Ok(Box::new(MockTouch {
            script: Arc::clone(&self.touch),
        }))
    }

    fn open_ultrasonic(&self, port: SensorPort) -> Result<Box<dyn UltrasonicSensor>> {
        log::debug!("mock: opening ultrasonic sensor on {}", port);
        Ok(Box::new(MockUltrasonic {
            script: Arc::clone(&self.ultrasonic),
        }))
    }
}

/// Locator that hands out one preconfigured mock brick, or none
pub struct MockLocator {
    brick: Option<Arc<MockBrick>>,
}

impl MockLocator {
    pub fn new(brick: Arc<MockBrick>) -> Self {
        Self { brick: Some(brick) }
    }

    /// Locator that never finds anything
    pub fn empty() -> Self {
        Self { brick: None }
    }
}

impl BrickLocator for MockLocator {
    fn find_one_brick(&self, debug: bool) -> Result<Arc<dyn Brick>> {
        if debug {
            log::debug!("mock: searching for brick");
        }
        match &self.brick {
            Some(brick) => {
                let brick: Arc<dyn Brick> = brick.clone();
                Ok(brick)
            }
            None => Err(Error::BrickNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_commands_journaled() {
        let brick = MockBrick::new();
        let mut pair = brick.open_synchronized(MotorPort::A, MotorPort::C).unwrap();
        pair.run(50).unwrap();
        pair.idle().unwrap();

        assert_eq!(
            brick.journal().events(),
            vec![
                MockEvent::Run {
                    actuator: Actuator::Pair(MotorPort::A, MotorPort::C),
                    power: 50
                },
                MockEvent::Idle {
                    actuator: Actuator::Pair(MotorPort::A, MotorPort::C)
                },
            ]
        );
    }

    #[test]
    fn test_jammed_turn_fails() {
        let brick = MockBrick::new();
        brick.jam(MotorPort::B);
        let mut servo = brick.open_motor(MotorPort::B).unwrap();

        assert!(matches!(servo.turn(-20, 180.0), Err(Error::Hardware(_))));
        assert_eq!(brick.journal().turns().len(), 1);
    }

    #[test]
    fn test_faulted_port_rejects_everything() {
        let brick = MockBrick::new();
        brick.fault(MotorPort::C);
        let mut pair = brick.open_synchronized(MotorPort::A, MotorPort::C).unwrap();

        assert!(pair.run(10).is_err());
        assert!(pair.idle().is_err());
        assert_eq!(brick.journal().motor_command_count(), 0);
    }

    #[test]
    fn test_pair_needs_distinct_ports() {
        let brick = MockBrick::new();
        assert!(brick.open_synchronized(MotorPort::A, MotorPort::A).is_err());
    }

    #[test]
    fn test_locator() {
        let brick = MockBrick::shared();
        assert!(MockLocator::new(brick).find_one_brick(true).is_ok());
        assert!(matches!(
            MockLocator::empty().find_one_brick(false),
            Err(Error::BrickNotFound)
        ));
    }
}
