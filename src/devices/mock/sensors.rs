//! Mock sensor drivers backed by scripted readings

use super::journal::{Journal, MockEvent};
use crate::drivers::{LightSensor, SoundSensor, TouchSensor, UltrasonicSensor};
use crate::error::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Queued readings first, then a steady level
#[derive(Debug)]
pub struct ReadingScript<T> {
    queued: VecDeque<T>,
    level: T,
}

impl<T: Copy> ReadingScript<T> {
    pub fn new(level: T) -> Self {
        Self {
            queued: VecDeque::new(),
            level,
        }
    }

    pub fn next(&mut self) -> T {
        self.queued.pop_front().unwrap_or(self.level)
    }

    pub fn set_level(&mut self, level: T) {
        self.level = level;
    }

    pub fn queue<I: IntoIterator<Item = T>>(&mut self, readings: I) {
        self.queued.extend(readings);
    }
}

/// Reading script shared between the brick and the sensors opened from it
pub type SharedScript<T> = Arc<Mutex<ReadingScript<T>>>;

pub struct MockLight {
    pub(super) script: SharedScript<u16>,
    pub(super) illuminated: Arc<AtomicBool>,
    pub(super) journal: Journal,
}

impl LightSensor for MockLight {
    fn lightness(&mut self) -> Result<u16> {
        Ok(self.script.lock().next())
    }

    fn set_illuminated(&mut self, on: bool) -> Result<()> {
        self.illuminated.store(on, Ordering::Relaxed);
        self.journal.record(MockEvent::Illuminated(on));
        Ok(())
    }
}

pub struct MockSound {
    pub(super) script: SharedScript<u16>,
}

impl SoundSensor for MockSound {
    fn sample(&mut self) -> Result<u16> {
        Ok(self.script.lock().next())
    }
}

pub struct MockTouch {
    pub(super) script: SharedScript<bool>,
}

impl TouchSensor for MockTouch {
    fn is_pressed(&mut self) -> Result<bool> {
        Ok(self.script.lock().next())
    }
}

pub struct MockUltrasonic {
    pub(super) script: SharedScript<u8>,
}

impl UltrasonicSensor for MockUltrasonic {
    fn distance(&mut self) -> Result<u8> {
        Ok(self.script.lock().next())
    }
}
