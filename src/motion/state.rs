//! Shared run state: the running flag and the stop epoch

use crate::actuators::DriveUnit;
use crate::error::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct RunInner {
    running: bool,
    /// Bumped by every motion start and every stop
    epoch: u64,
}

/// Running flag guarded by a mutex, with a condvar signalled on every change
#[derive(Debug, Default)]
pub struct RunState {
    inner: Mutex<RunInner>,
    changed: Condvar,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guarded read of the running flag
    pub fn is_running(&self) -> bool {
        self.inner.lock().running
    }

    /// Guarded write of the running flag
    pub fn set_running(&self, running: bool) {
        let mut inner = self.inner.lock();
        inner.running = running;
        self.changed.notify_all();
    }

    /// Claim the drive for a new motion. Fails with [`Error::Busy`] when
    /// another motion is still running, leaving that motion untouched.
    pub fn begin(&self) -> Result<u64> {
        let mut inner = self.inner.lock();
        if inner.running {
            return Err(Error::Busy);
        }
        inner.running = true;
        inner.epoch += 1;
        self.changed.notify_all();
        Ok(inner.epoch)
    }

    /// External stop: invalidate the current motion and clear the flag
    pub fn cancel(&self) {
        let _ = self.cancel_with(|| Ok(()));
    }

    /// Run `halt`, then invalidate the current motion and clear the flag.
    ///
    /// The flag is cleared whatever `halt` returns. Holding the lock across
    /// `halt` keeps a worker that has not started its drive yet from starting
    /// it after the stop.
    pub fn cancel_with<F>(&self, halt: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        let mut inner = self.inner.lock();
        let result = halt();
        inner.epoch += 1;
        inner.running = false;
        self.changed.notify_all();
        result
    }

    /// Run `f` under the lock if the motion at `epoch` is still current
    pub fn if_current<F, T>(&self, epoch: u64, f: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        let inner = self.inner.lock();
        (inner.epoch == epoch).then(f)
    }

    /// True when the motion started at `epoch` has been stopped or replaced
    pub fn is_cancelled(&self, epoch: u64) -> bool {
        self.inner.lock().epoch != epoch
    }

    /// Wait up to `timeout` for the motion at `epoch` to be cancelled.
    ///
    /// A zero timeout only yields the thread. Returns true once cancelled.
    pub fn wait_cancelled(&self, epoch: u64, timeout: Duration) -> bool {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            return true;
        }
        if timeout.is_zero() {
            drop(inner);
            thread::yield_now();
            return self.is_cancelled(epoch);
        }

        let deadline = Instant::now() + timeout;
        while inner.epoch == epoch {
            if self.changed.wait_until(&mut inner, deadline).timed_out() {
                break;
            }
        }
        inner.epoch != epoch
    }

    /// Run `halt` and clear the flag, but only if the motion at `epoch` is
    /// still current. The lock is held across `halt`, so a stale worker can
    /// never stop a motion that started after it was cancelled.
    pub fn finish_with<F>(&self, epoch: u64, halt: F) -> Option<Result<()>>
    where
        F: FnOnce() -> Result<()>,
    {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            return None;
        }
        let result = halt();
        inner.running = false;
        self.changed.notify_all();
        Some(result)
    }

    /// Clear the flag if the motion at `epoch` is still current
    pub fn finish(&self, epoch: u64) {
        let _ = self.finish_with(epoch, || Ok(()));
    }
}

/// Idle (and optionally brake) the drive, then cancel the current motion.
///
/// The flag is cleared even when the motor command fails.
pub(crate) fn halt_and_cancel(state: &RunState, drive: &DriveUnit, brake: bool) -> Result<()> {
    log::debug!("Stopping drive (brake={})", brake);
    state.cancel_with(|| drive.halt(brake))
}

/// Cloneable handle that can stop the robot from another thread
///
/// Holds the drive bound when the handle was taken.
#[derive(Debug, Clone)]
pub struct StopHandle {
    pub(crate) state: Arc<RunState>,
    pub(crate) drive: Option<DriveUnit>,
}

impl StopHandle {
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn stop(&self, brake: bool) -> Result<()> {
        match &self.drive {
            Some(drive) => halt_and_cancel(&self.state, drive, brake),
            None => {
                self.state.cancel();
                Err(Error::NotInitialized("drive"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_read_write() {
        let state = RunState::new();
        assert!(!state.is_running());
        state.set_running(true);
        assert!(state.is_running());
        state.set_running(false);
        assert!(!state.is_running());
    }

    #[test]
    fn test_begin_rejects_when_running() {
        let state = RunState::new();
        let epoch = state.begin().unwrap();
        assert!(state.is_running());
        assert!(matches!(state.begin(), Err(Error::Busy)));
        // The running motion is unaffected
        assert!(state.is_running());
        assert!(!state.is_cancelled(epoch));
    }

    #[test]
    fn test_finish_ignores_stale_epoch() {
        let state = RunState::new();
        let first = state.begin().unwrap();
        state.cancel();
        let second = state.begin().unwrap();
        assert_ne!(first, second);

        let mut halted = false;
        assert!(state.finish_with(first, || {
            halted = true;
            Ok(())
        })
        .is_none());
        assert!(!halted);
        assert!(state.is_running());

        state.finish(second);
        assert!(!state.is_running());
    }

    #[test]
    fn test_cancel_with_clears_flag_on_error() {
        let state = RunState::new();
        let epoch = state.begin().unwrap();
        let result = state.cancel_with(|| Err(Error::Hardware("motor offline".into())));
        assert!(result.is_err());
        assert!(!state.is_running());
        assert!(state.is_cancelled(epoch));
        assert_eq!(state.if_current(epoch, || 1), None);
    }

    #[test]
    fn test_wait_cancelled_wakes_on_cancel() {
        let state = Arc::new(RunState::new());
        let epoch = state.begin().unwrap();

        let canceller = Arc::clone(&state);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            canceller.cancel();
        });

        let start = Instant::now();
        assert!(state.wait_cancelled(epoch, Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_cancelled_times_out() {
        let state = RunState::new();
        let epoch = state.begin().unwrap();
        assert!(!state.wait_cancelled(epoch, Duration::from_millis(10)));
        assert!(!state.wait_cancelled(epoch, Duration::ZERO));
    }
}
