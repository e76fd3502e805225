//! brickbot - rehearsal run against the mock brick
//!
//! Drives a short mission (step, spin, timed run, obstacle approach, servo,
//! retrace, Morse) so configuration and timing can be checked without
//! hardware.

use brickbot::devices::mock::{MockBrick, MockLocator};
use brickbot::{
    BrickbotConfig, Error, MotionRequest, MotorPort, Result, Robot, Route, SERVO_NICE, SensorPort,
};
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Parse config path from command line arguments.
///
/// Supports:
/// - `brickbot <path>` (positional)
/// - `brickbot --config <path>` (flag-based)
/// - `brickbot -c <path>` (short flag)
///
/// Defaults to `brickbot.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "brickbot.toml".to_string()
}

/// Load the file if it exists, stock defaults otherwise
fn load_config(path: &str) -> Result<(BrickbotConfig, bool)> {
    if Path::new(path).exists() {
        Ok((BrickbotConfig::from_file(path)?, true))
    } else {
        Ok((BrickbotConfig::default(), false))
    }
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let (config, from_file) = load_config(&config_path)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("brickbot v{} rehearsal starting...", env!("CARGO_PKG_VERSION"));
    if from_file {
        log::info!("Using config: {}", config_path);
    } else {
        log::info!("No config at {}, using defaults", config_path);
    }

    let brick = MockBrick::shared();
    brick.set_turn_duration(Duration::from_millis(250));

    let mut robot = Robot::connect(&MockLocator::new(Arc::clone(&brick)), config)?;
    robot.init_drive(MotorPort::A, MotorPort::C)?;
    robot.init_servo(MotorPort::B)?;
    let sonar = robot.init_ultrasonic_sensor(SensorPort::S4)?;

    // Set up shutdown signal handler
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    let stop = robot.stop_handle();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        flag.store(true, Ordering::Relaxed);
        if let Err(e) = stop.stop(true) {
            log::error!("Failed to stop drive: {}", e);
        }
    })
    .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;

    let proceed = |name: &str| {
        let go = !interrupted.load(Ordering::Relaxed);
        if go {
            log::info!("Rehearsal: {}", name);
        }
        go
    };

    let mut route = Route::new();

    if proceed("step forward 15 cm") {
        route.forward(&robot, 15.0)?;
    }

    if proceed("spin 90 degrees") {
        robot.spin(90.0, 40)?;
    }

    if proceed("timed run, 1 s") {
        robot.move_forward(MotionRequest::seconds(1.0).wait())?;
    }

    if proceed("approach obstacle") {
        // Simulated obstacle shows up half a second in
        let obstacle = Arc::clone(&brick);
        let approach = thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            obstacle.set_distance(12);
        });
        robot.move_forward(
            MotionRequest::until(move || Ok(sonar.distance()? < 20))
                .brake(true)
                .wait(),
        )?;
        if approach.join().is_err() {
            log::warn!("Obstacle simulation thread panicked");
        }
    }

    if proceed("servo flourish") {
        robot.set_servo(SERVO_NICE)?;
    }

    if proceed("detour") {
        route.turn_right(&robot, 30, 90.0)?;
        route.forward(&robot, 10.0)?;
        route.turn_left(&robot, 30, 90.0)?;
    }

    if proceed("retrace") {
        route.retrace(&robot, robot.power())?;
    }

    if proceed("morse SOS") {
        robot.morse("SOS")?;
    }

    log::info!(
        "Rehearsal complete: {} motor commands issued",
        brick.journal().motor_command_count()
    );
    Ok(())
}
