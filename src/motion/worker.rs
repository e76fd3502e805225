//! Until-loop executed on the motion worker thread

use super::request::Predicate;
use super::state::RunState;
use crate::actuators::DriveUnit;
use crate::error::{Error, Result};
use crate::util::Countdown;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One predicate- or time-bounded motion
pub(crate) struct UntilLoop {
    drive: DriveUnit,
    state: Arc<RunState>,
    epoch: u64,
    power: i8,
    brake: bool,
    poll_interval: Duration,
    predicate: Predicate,
    /// Set for timed motion so the last wait ends on the deadline
    deadline: Option<Countdown>,
    stopped: bool,
}

/// How the polling ended
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Satisfied,
    Cancelled,
}

impl UntilLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        drive: DriveUnit,
        state: Arc<RunState>,
        epoch: u64,
        power: i8,
        brake: bool,
        poll_interval: Duration,
        predicate: Predicate,
        deadline: Option<Countdown>,
    ) -> Self {
        Self {
            drive,
            state,
            epoch,
            power,
            brake,
            poll_interval,
            predicate,
            deadline,
            stopped: false,
        }
    }

    /// Start the loop on a named thread
    pub fn spawn(self) -> Result<JoinHandle<Result<()>>> {
        let handle = thread::Builder::new()
            .name("motion-worker".to_string())
            .spawn(move || {
                let result = self.run();
                if let Err(e) = &result {
                    log::warn!("Motion worker: motion aborted: {}", e);
                }
                result
            })?;
        Ok(handle)
    }

    /// Drive at `power` until the predicate holds or the motion is stopped
    pub fn run(mut self) -> Result<()> {
        log::debug!(
            "Motion worker: running at power={} (epoch {})",
            self.power,
            self.epoch
        );

        // A stop that lands before the drive starts leaves it idle
        let started = self
            .state
            .if_current(self.epoch, || self.drive.run(self.power));
        let polled = match started {
            Some(started) => started.and_then(|_| self.poll()),
            None => Ok(Outcome::Cancelled),
        };
        let halted = self.stop_drive();

        match polled? {
            Outcome::Satisfied => log::debug!("Motion worker: predicate satisfied"),
            Outcome::Cancelled => log::debug!("Motion worker: stopped externally"),
        }
        halted
    }

    fn poll(&mut self) -> Result<Outcome> {
        let mut polls: u64 = 0;
        loop {
            polls += 1;
            if (self.predicate)()? {
                log::trace!("Motion worker: predicate true after {} polls", polls);
                return Ok(Outcome::Satisfied);
            }

            let wait = match &self.deadline {
                Some(deadline) => self.poll_interval.min(deadline.remaining()),
                None => self.poll_interval,
            };
            if self.state.wait_cancelled(self.epoch, wait) {
                return Ok(Outcome::Cancelled);
            }
        }
    }

    /// Halt the drive and clear the flag unless an external stop already did
    fn stop_drive(&mut self) -> Result<()> {
        self.stopped = true;
        let drive = &self.drive;
        let brake = self.brake;
        self.state
            .finish_with(self.epoch, || drive.halt(brake))
            .unwrap_or(Ok(()))
    }
}

impl Drop for UntilLoop {
    fn drop(&mut self) {
        // Only reached without stop_drive when the predicate panicked
        if !self.stopped
            && let Err(e) = self.stop_drive()
        {
            log::error!("Motion worker: failed to stop drive: {}", e);
        }
    }
}

/// Join a worker, folding a panic into [`Error::WorkerPanicked`]
pub(crate) fn join(handle: JoinHandle<Result<()>>) -> Result<()> {
    handle.join().unwrap_or(Err(Error::WorkerPanicked))
}
