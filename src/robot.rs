//! Robot - the aggregate mission scripts talk to

use crate::actuators::{DriveUnit, Servo};
use crate::calibration::{self, Operator};
use crate::config::BrickbotConfig;
use crate::core::types::{
    CalibrationBounds, Illumination, MotorPort, SensorKind, SensorPort, ServoPosition,
};
use crate::drivers::{Brick, BrickLocator};
use crate::error::{Error, Result};
use crate::morse;
use crate::motion::request::{validate_degrees, validate_distance, validate_seconds};
use crate::motion::worker::{self, UntilLoop};
use crate::motion::{
    Direction, MotionRequest, Predicate, RunState, StopHandle, Termination, validate_magnitude,
    validate_signed,
};
use crate::sensors::{LightHandle, SensorHandle, SoundHandle, TouchHandle, UltrasonicHandle};
use crate::util::Countdown;

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// What a validated request turns into once the drive is claimed
enum Plan {
    Turn(f64),
    Poll(Predicate, Option<Countdown>),
    Run,
}

/// Two-wheeled robot on a brick
///
/// Owns the brick link, the drive, an optional servo and at most one sensor
/// of each kind. Motion operations take `&self`, so a robot shared behind an
/// `Arc` can be stopped from any thread.
///
/// # Examples
///
/// ```
/// use brickbot::devices::mock::MockBrick;
/// use brickbot::{BrickbotConfig, MotionRequest, MotorPort, Robot};
///
/// # fn main() -> brickbot::Result<()> {
/// let brick = MockBrick::shared();
/// let mut robot = Robot::new(brick.clone(), BrickbotConfig::default())?;
/// robot.init_drive(MotorPort::A, MotorPort::C)?;
///
/// // Blocking 15 cm step
/// robot.move_forward(MotionRequest::distance(15.0).power(75))?;
/// assert!(!robot.running());
///
/// // Run until stopped
/// robot.move_forward(MotionRequest::forever())?;
/// assert!(robot.running());
/// robot.stop(false)?;
/// assert!(!robot.running());
/// # Ok(())
/// # }
/// ```
pub struct Robot {
    /// Link to the brick (None when detached)
    brick: Option<Arc<dyn Brick>>,

    config: BrickbotConfig,

    /// Default power magnitude
    power: i8,

    /// Running flag and stop epoch, shared with the motion worker
    state: Arc<RunState>,

    drive: Option<DriveUnit>,
    servo: Option<Servo>,
    light: Option<LightHandle>,
    sound: Option<SoundHandle>,
    touch: Option<TouchHandle>,
    ultrasonic: Option<UltrasonicHandle>,

    /// Handle of the last until/timed motion started without `wait`
    worker: Mutex<Option<JoinHandle<Result<()>>>>,
}

impl Robot {
    // === Constructors ===

    /// Robot linked to `brick`
    pub fn new(brick: Arc<dyn Brick>, config: BrickbotConfig) -> Result<Self> {
        Self::build(Some(brick), config)
    }

    /// Robot without a hardware link; any binding fails with
    /// [`Error::NotConnected`]
    pub fn detached(config: BrickbotConfig) -> Result<Self> {
        Self::build(None, config)
    }

    /// Find a brick through `locator` and link to it
    pub fn connect(locator: &dyn BrickLocator, config: BrickbotConfig) -> Result<Self> {
        log::info!("Robot: searching for brick");
        let brick = locator.find_one_brick(log::log_enabled!(log::Level::Debug))?;
        log::info!("Robot: brick found");
        Self::new(brick, config)
    }

    fn build(brick: Option<Arc<dyn Brick>>, config: BrickbotConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            brick,
            power: config.robot.default_power,
            config,
            state: Arc::new(RunState::new()),
            drive: None,
            servo: None,
            light: None,
            sound: None,
            touch: None,
            ultrasonic: None,
            worker: Mutex::new(None),
        })
    }

    // === Configuration ===

    pub fn brick(&self) -> Result<&Arc<dyn Brick>> {
        self.brick.as_ref().ok_or(Error::NotConnected)
    }

    pub fn is_connected(&self) -> bool {
        self.brick.is_some()
    }

    pub fn config(&self) -> &BrickbotConfig {
        &self.config
    }

    /// Default power magnitude for requests that carry none
    pub fn power(&self) -> i8 {
        self.power
    }

    pub fn set_power(&mut self, power: i8) -> Result<()> {
        self.power = validate_magnitude(power)?;
        Ok(())
    }

    // === Bindings ===

    /// Bind the drive: a synchronized pair plus both wheels individually.
    ///
    /// Replaces any previous drive. Fails with [`Error::Busy`] while a
    /// motion is running on the current one.
    pub fn init_drive(&mut self, left: MotorPort, right: MotorPort) -> Result<DriveUnit> {
        if self.state.is_running() {
            return Err(Error::Busy);
        }
        log::debug!("Initializing motors at ports {} and {}", left, right);
        let drive = DriveUnit::open(self.brick()?.as_ref(), left, right)?;
        self.drive = Some(drive.clone());
        Ok(drive)
    }

    pub fn init_servo(&mut self, port: MotorPort) -> Result<Servo> {
        log::debug!("Initializing servo at port {}", port);
        let servo = Servo::open(self.brick()?.as_ref(), port)?;
        self.servo = Some(servo.clone());
        Ok(servo)
    }

    /// Bind a sensor of `kind` to `port`, replacing any sensor of that kind
    pub fn init_sensor(&mut self, kind: SensorKind, port: SensorPort) -> Result<SensorHandle> {
        let handle = SensorHandle::open(self.brick()?.as_ref(), kind, port)?;
        self.attach(handle.clone());
        Ok(handle)
    }

    /// Store an already opened sensor handle in its slot
    pub fn attach(&mut self, handle: SensorHandle) {
        match handle {
            SensorHandle::Light(h) => self.light = Some(h),
            SensorHandle::Sound(h) => self.sound = Some(h),
            SensorHandle::Touch(h) => self.touch = Some(h),
            SensorHandle::Ultrasonic(h) => self.ultrasonic = Some(h),
        }
    }

    pub fn init_light_sensor(&mut self, port: SensorPort) -> Result<LightHandle> {
        log::debug!("Initializing sensor light at port {}", port);
        let handle = LightHandle::open(self.brick()?.as_ref(), port)?;
        self.light = Some(handle.clone());
        Ok(handle)
    }

    pub fn init_sound_sensor(&mut self, port: SensorPort) -> Result<SoundHandle> {
        log::debug!("Initializing sensor sound at port {}", port);
        let handle = SoundHandle::open(self.brick()?.as_ref(), port)?;
        self.sound = Some(handle.clone());
        Ok(handle)
    }

    pub fn init_touch_sensor(&mut self, port: SensorPort) -> Result<TouchHandle> {
        log::debug!("Initializing sensor touch at port {}", port);
        let handle = TouchHandle::open(self.brick()?.as_ref(), port)?;
        self.touch = Some(handle.clone());
        Ok(handle)
    }

    pub fn init_ultrasonic_sensor(&mut self, port: SensorPort) -> Result<UltrasonicHandle> {
        log::debug!("Initializing sensor ultrasonic at port {}", port);
        let handle = UltrasonicHandle::open(self.brick()?.as_ref(), port)?;
        self.ultrasonic = Some(handle.clone());
        Ok(handle)
    }

    pub fn drive(&self) -> Option<DriveUnit> {
        self.drive.clone()
    }

    pub fn servo(&self) -> Option<Servo> {
        self.servo.clone()
    }

    pub fn light(&self) -> Option<LightHandle> {
        self.light.clone()
    }

    pub fn sound(&self) -> Option<SoundHandle> {
        self.sound.clone()
    }

    pub fn touch(&self) -> Option<TouchHandle> {
        self.touch.clone()
    }

    pub fn ultrasonic(&self) -> Option<UltrasonicHandle> {
        self.ultrasonic.clone()
    }

    fn require_drive(&self) -> Result<&DriveUnit> {
        self.drive.as_ref().ok_or(Error::NotInitialized("drive"))
    }

    // === Motion ===

    pub fn move_forward(&self, request: MotionRequest) -> Result<()> {
        self.dispatch(Direction::Forward, request)
    }

    pub fn move_backward(&self, request: MotionRequest) -> Result<()> {
        self.dispatch(Direction::Backward, request)
    }

    fn dispatch(&self, direction: Direction, request: MotionRequest) -> Result<()> {
        let MotionRequest {
            termination,
            power,
            wait,
            brake,
        } = request;

        // Everything that can be rejected is rejected before the flag is set
        let power = direction.apply(validate_magnitude(power.unwrap_or(self.power))?);
        let brake = brake.unwrap_or(self.config.motion.brake_on_stop);
        let drive = self.require_drive()?.clone();
        let mode = termination.name();
        let plan = match termination {
            Termination::Distance(cm) => {
                Plan::Turn(self.config.chassis.degrees_for_distance(validate_distance(cm)?))
            }
            Termination::Until(predicate) => Plan::Poll(predicate, None),
            Termination::Seconds(seconds) => {
                let countdown = Countdown::start(validate_seconds(seconds)?);
                let predicate: Predicate = Box::new(move || Ok(countdown.expired()));
                Plan::Poll(predicate, Some(countdown))
            }
            Termination::Forever => {
                if wait {
                    return Err(Error::InvalidParameter(
                        "a forever motion cannot be waited on".to_string(),
                    ));
                }
                Plan::Run
            }
        };

        // Busy without waiting on the slot lock
        if self.state.is_running() {
            return Err(Error::Busy);
        }
        let mut slot = self.worker.lock();
        if self.state.is_running() {
            return Err(Error::Busy);
        }
        // A previous worker was stopped or has finished; collect it
        if let Some(previous) = slot.take()
            && let Err(e) = worker::join(previous)
        {
            log::error!("Robot: previous motion failed: {}", e);
        }

        let epoch = self.state.begin()?;
        log::debug!(
            "Robot: {:?} {} at power={} (epoch {})",
            direction,
            mode,
            power,
            epoch
        );

        match plan {
            Plan::Turn(degrees) => {
                drop(slot);
                let turned = turn_if_current(&self.state, epoch, &drive, power, degrees);
                let settled = self
                    .state
                    .finish_with(epoch, || if brake { drive.brake() } else { Ok(()) })
                    .unwrap_or(Ok(()));
                turned.and(settled)
            }
            Plan::Run => {
                drop(slot);
                run_if_current(&self.state, epoch, &drive, power)
            }
            Plan::Poll(predicate, deadline) => {
                let until = UntilLoop::new(
                    drive,
                    Arc::clone(&self.state),
                    epoch,
                    power,
                    brake,
                    self.config.motion.poll_interval(),
                    predicate,
                    deadline,
                );
                let handle = until.spawn()?;
                if wait {
                    // Other callers must see Busy, not queue on the slot
                    drop(slot);
                    worker::join(handle)
                } else {
                    *slot = Some(handle);
                    Ok(())
                }
            }
        }
    }

    /// Block until the outstanding until/timed motion ends and return its
    /// result. Returns at once when there is none; a forever motion has no
    /// worker to wait for.
    pub fn wait_for_motion(&self) -> Result<()> {
        let handle = self.worker.lock().take();
        match handle {
            Some(handle) => worker::join(handle),
            None => Ok(()),
        }
    }

    /// Idle the drive (then brake if asked) and end any running motion.
    ///
    /// Safe to call when nothing is running.
    pub fn stop(&self, brake: bool) -> Result<()> {
        self.stop_handle().stop(brake)
    }

    /// Handle that can stop this robot from another thread.
    ///
    /// The handle holds the drive bound at the time of the call. Take it
    /// after `init_drive`, and take a new one after rebinding: a handle taken
    /// earlier fails with [`Error::NotInitialized`] or idles the old motors.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            state: Arc::clone(&self.state),
            drive: self.drive.clone(),
        }
    }

    /// Stop, then pivot right on the left wheel
    pub fn turn_right(&self, power: i8, degrees: f64) -> Result<()> {
        let power = validate_signed(power)?;
        let degrees = validate_degrees(degrees)?;
        let drive = self.require_drive()?;
        self.stop(false)?;
        log::debug!("Robot: turn right power={} degrees={:.1}", power, degrees);
        drive.left().lock().turn(power, degrees)
    }

    /// Stop, then pivot left on the right wheel
    pub fn turn_left(&self, power: i8, degrees: f64) -> Result<()> {
        let power = validate_signed(power)?;
        let degrees = validate_degrees(degrees)?;
        let drive = self.require_drive()?;
        self.stop(false)?;
        log::debug!("Robot: turn left power={} degrees={:.1}", power, degrees);
        drive.right().lock().turn(power, degrees)
    }

    /// Spin in place: both wheels turn `|degrees|` in opposite directions at
    /// once. Positive degrees spin clockwise (left wheel forward).
    ///
    /// Returns after both wheels finish; the left wheel's error wins when
    /// both fail.
    pub fn spin(&self, degrees: f64, power: i8) -> Result<()> {
        let magnitude = validate_magnitude(power)?;
        let degrees = validate_degrees(degrees)?;
        let drive = self.require_drive()?;

        let left_power = if degrees > 0.0 { magnitude } else { -magnitude };
        let right_power = -left_power;
        let amount = degrees.abs();
        log::debug!(
            "Robot: spin {:.1} degrees (left={}, right={})",
            degrees,
            left_power,
            right_power
        );

        thread::scope(|scope| {
            let left = thread::Builder::new()
                .name("spin-left".to_string())
                .spawn_scoped(scope, || drive.left().lock().turn(left_power, amount))?;
            let right = thread::Builder::new()
                .name("spin-right".to_string())
                .spawn_scoped(scope, || drive.right().lock().turn(right_power, amount))?;

            let left = left.join().unwrap_or(Err(Error::WorkerPanicked));
            let right = right.join().unwrap_or(Err(Error::WorkerPanicked));
            left.and(right)
        })
    }

    /// Guarded read of the running flag
    pub fn running(&self) -> bool {
        self.state.is_running()
    }

    /// Guarded write of the running flag
    pub fn set_running(&self, running: bool) {
        self.state.set_running(running);
    }

    // === Peripherals ===

    pub fn turn_light_sensor(&self, state: Illumination) -> Result<()> {
        self.light
            .as_ref()
            .ok_or(Error::NotInitialized("light sensor"))?
            .set_illuminated(state)
    }

    /// Move the servo to a named position. Sub-move failures are logged, not
    /// returned.
    pub fn set_servo(&self, position: ServoPosition) -> Result<()> {
        let servo = self.servo.as_ref().ok_or(Error::NotInitialized("servo"))?;
        servo.set_position(position, &self.config.servo);
        Ok(())
    }

    pub fn calibrate_light(&self, operator: &mut dyn Operator) -> Result<CalibrationBounds> {
        let light = self
            .light
            .as_ref()
            .ok_or(Error::NotInitialized("light sensor"))?;
        calibration::calibrate_light(light, operator, &self.config.calibration)
    }

    pub fn calibrate_sound(&self, operator: &mut dyn Operator) -> Result<CalibrationBounds> {
        let sound = self
            .sound
            .as_ref()
            .ok_or(Error::NotInitialized("sound sensor"))?;
        calibration::calibrate_sound(sound, operator, &self.config.calibration)
    }

    /// Beep `message` in Morse on the brick speaker
    pub fn morse(&self, message: &str) -> Result<()> {
        morse::play(&**self.brick()?, message, &self.config.morse)
    }
}

/// Start a forever motion unless a stop already ended the motion at `epoch`.
///
/// The run is issued under the state lock, so a concurrent stop either idles
/// the running drive or lands first and the drive never starts.
fn run_if_current(state: &RunState, epoch: u64, drive: &DriveUnit, power: i8) -> Result<()> {
    match state.if_current(epoch, || drive.run(power)) {
        Some(started) => started.inspect_err(|_| state.finish(epoch)),
        None => {
            log::debug!("Robot: stopped before the drive started (epoch {})", epoch);
            Ok(())
        }
    }
}

/// Blocking distance turn, skipped when a stop already ended the motion.
///
/// The pair is claimed under the state lock: a stop that arrives later waits
/// for the turn to finish before idling.
fn turn_if_current(
    state: &RunState,
    epoch: u64,
    drive: &DriveUnit,
    power: i8,
    degrees: f64,
) -> Result<()> {
    let Some(mut pair) = state.if_current(epoch, || drive.lock_pair()) else {
        log::debug!("Robot: stopped before the turn started (epoch {})", epoch);
        return Ok(());
    };
    log::trace!("Drive: turn power={} degrees={:.1}", power, degrees);
    pair.turn(power, degrees)
}

impl fmt::Debug for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Robot")
            .field("connected", &self.brick.is_some())
            .field("power", &self.power)
            .field("running", &self.state.is_running())
            .field("drive", &self.drive)
            .field("servo", &self.servo)
            .field("light", &self.light)
            .field("sound", &self.sound)
            .field("touch", &self.touch)
            .field("ultrasonic", &self.ultrasonic)
            .finish()
    }
}

impl Drop for Robot {
    fn drop(&mut self) {
        if self.state.is_running() {
            log::info!("Robot: stopping motion on shutdown");
            if let Err(e) = self.stop(false) {
                log::error!("Robot: failed to stop drive: {}", e);
            }
        }

        if let Some(handle) = self.worker.get_mut().take()
            && let Err(e) = worker::join(handle)
        {
            log::error!("Robot: motion worker failed: {}", e);
        }
    }
}
