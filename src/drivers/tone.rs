//! Tone playback trait

use crate::error::Result;
use std::time::Duration;

/// Speaker on the brick
pub trait ToneDevice: Send + Sync {
    /// Play a tone and block until it has finished
    fn play_tone_and_wait(&self, frequency_hz: u16, duration: Duration) -> Result<()>;
}
