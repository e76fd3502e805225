//! Light and sound calibration
//!
//! Both procedures have the same shape: ask the operator to set up a
//! reference condition, sample the sensor, derive [`CalibrationBounds`].
//! Prompts go through an [`Operator`] so the same procedure runs
//! interactively at a console or unattended on fixed dwell times.

use crate::config::CalibrationConfig;
use crate::core::types::CalibrationBounds;
use crate::error::{Error, Result};
use crate::sensors::{LightHandle, SoundHandle};
use crate::util::countdown;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

/// Whoever sets up the reference conditions during calibration
pub trait Operator {
    /// Show `message` and block until the operator is ready
    fn prompt(&mut self, message: &str) -> Result<()>;
}

/// Closures work as operators, mostly for scripted tests
impl<F> Operator for F
where
    F: FnMut(&str) -> Result<()>,
{
    fn prompt(&mut self, message: &str) -> Result<()> {
        self(message)
    }
}

/// Interactive operator: prints the prompt and waits for Enter on stdin
#[derive(Debug, Default)]
pub struct ConsoleOperator;

impl Operator for ConsoleOperator {
    fn prompt(&mut self, message: &str) -> Result<()> {
        log::info!("Calibration: {}", message);
        let mut stdout = io::stdout();
        write!(stdout, "{} [press Enter when ready] ", message)?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }
}

/// Unattended operator: logs the prompt and gives the scene a fixed dwell time
#[derive(Debug, Clone)]
pub struct Unattended {
    dwell: Duration,
}

impl Unattended {
    pub fn new(dwell: Duration) -> Self {
        Self { dwell }
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(config.dwell())
    }
}

impl Operator for Unattended {
    fn prompt(&mut self, message: &str) -> Result<()> {
        log::info!("Calibration: {} (waiting {:?})", message, self.dwell);
        thread::sleep(self.dwell);
        Ok(())
    }
}

/// Read the light surface, then the dark surface.
///
/// Returns `(low, high) = (dark, light)`. Equal readings would make every
/// later normalization divide by zero, so they fail here.
pub fn calibrate_light(
    light: &LightHandle,
    operator: &mut dyn Operator,
    config: &CalibrationConfig,
) -> Result<CalibrationBounds> {
    log::info!("Calibrating light sensor on {}...", light.port());

    thread::sleep(config.settle());
    operator.prompt("Point the sensor at the white surface")?;
    log::info!("Reading white value...");
    let white = light.lightness()?;

    thread::sleep(config.settle());
    operator.prompt("Point the sensor at the black line")?;
    log::info!("Reading black value...");
    let black = light.lightness()?;

    log::info!("Calibration finished: white={}, black={}", white, black);

    let bounds = CalibrationBounds::new(f64::from(black), f64::from(white));
    if bounds.is_degenerate() {
        return Err(Error::DegenerateRange {
            low: bounds.low,
            high: bounds.high,
        });
    }
    Ok(bounds)
}

/// Sample a quiet window, then a loud one.
///
/// Loud samples count only when strictly above the loudest quiet sample, which
/// filters out the noise floor. Returns `(mean quiet, mean loud)`; fails with
/// [`Error::EmptyCalibrationWindow`] when nothing in the loud window cleared
/// the noise floor.
pub fn calibrate_sound(
    sound: &SoundHandle,
    operator: &mut dyn Operator,
    config: &CalibrationConfig,
) -> Result<CalibrationBounds> {
    log::info!("Calibrating sound sensor on {}...", sound.port());
    let window = config.sound_window();
    let interval = config.sound_sample_interval();

    operator.prompt("Keep quiet")?;
    let quiet = sample_window(sound, window, interval)?;
    let quiet_max = quiet.iter().copied().max().unwrap_or(0);
    let quiet_mean = mean(&quiet).ok_or(Error::EmptyCalibrationWindow("quiet"))?;
    log::debug!(
        "Quiet window: {} samples, mean={:.1}, max={}",
        quiet.len(),
        quiet_mean,
        quiet_max
    );

    operator.prompt("Make some noise")?;
    let loud: Vec<u16> = sample_window(sound, window, interval)?
        .into_iter()
        .filter(|&s| s > quiet_max)
        .collect();
    let loud_mean = mean(&loud).ok_or(Error::EmptyCalibrationWindow("loud"))?;
    log::debug!("Loud window: {} samples above {}", loud.len(), quiet_max);

    log::info!(
        "Calibration finished: quiet={:.1}, loud={:.1}",
        quiet_mean,
        loud_mean
    );
    Ok(CalibrationBounds::new(quiet_mean, loud_mean))
}

/// Sample until `window` has elapsed; always takes at least one sample
fn sample_window(sound: &SoundHandle, window: Duration, interval: Duration) -> Result<Vec<u16>> {
    let start = Instant::now();
    let mut samples = Vec::new();
    loop {
        samples.push(sound.sample()?);
        if countdown(start, window) {
            break;
        }
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }
    Ok(samples)
}

fn mean(samples: &[u16]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s)).sum();
    Some(sum / samples.len() as f64)
}
