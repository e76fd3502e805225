//! Motion engine tests against the mock brick
//!
//! Covers every termination mode, running-flag restoration on failure,
//! cancellation of a polling worker, and the spin fork-join.
//!
//! Run with: `cargo test --test robot_motion`

use approx::assert_relative_eq;
use brickbot::devices::mock::{Actuator, MockBrick, MockEvent};
use brickbot::{BrickbotConfig, Error, MotionRequest, MotorPort, Robot};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

const PAIR: Actuator = Actuator::Pair(MotorPort::A, MotorPort::C);

// ============================================================================
// Helpers
// ============================================================================

fn test_config() -> BrickbotConfig {
    let mut config = BrickbotConfig::default();
    config.motion.poll_interval_ms = 1;
    config
}

fn robot_with_drive(brick: &Arc<MockBrick>) -> Robot {
    let mut robot = Robot::new(brick.clone(), test_config()).unwrap();
    robot.init_drive(MotorPort::A, MotorPort::C).unwrap();
    robot
}

// ============================================================================
// Validation and flag restoration
// ============================================================================

#[test]
fn test_move_without_drive_fails_and_stays_idle() {
    let brick = MockBrick::shared();
    let robot = Robot::new(brick.clone(), test_config()).unwrap();

    let err = robot.move_forward(MotionRequest::distance(10.0)).unwrap_err();
    assert!(matches!(err, Error::NotInitialized("drive")));
    assert!(err.is_configuration());
    assert!(!robot.running());
    assert_eq!(brick.journal().motor_command_count(), 0);
}

#[test]
fn test_backward_rejects_non_positive_power() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    for power in [0, -30, 101] {
        match robot.move_backward(MotionRequest::forever().power(power)) {
            Err(e) => assert!(
                matches!(e, Error::InvalidParameter(_)) && e.is_configuration(),
                "power {}: {}",
                power,
                e
            ),
            Ok(()) => panic!("power {} accepted", power),
        }
        assert!(!robot.running());
    }
    assert_eq!(brick.journal().motor_command_count(), 0);
}

#[test]
fn test_bad_distance_rejected() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    assert!(robot.move_forward(MotionRequest::distance(0.0)).is_err());
    assert!(robot.move_forward(MotionRequest::distance(-5.0)).is_err());
    assert!(robot.move_forward(MotionRequest::seconds(-1.0)).is_err());
    assert!(!robot.running());
    assert_eq!(brick.journal().motor_command_count(), 0);
}

#[test]
fn test_forever_with_wait_rejected() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    let result = robot.move_forward(MotionRequest::forever().wait());
    assert!(matches!(result, Err(Error::InvalidParameter(_))));
    assert!(!robot.running());
}

#[test]
fn test_hardware_failure_clears_flag() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);
    brick.fault(MotorPort::C);

    let result = robot.move_forward(MotionRequest::forever());
    assert!(matches!(result, Err(Error::Hardware(_))));
    assert!(!robot.running());

    let result = robot.move_forward(MotionRequest::distance(10.0));
    assert!(matches!(result, Err(Error::Hardware(_))));
    assert!(!robot.running());
}

#[test]
fn test_running_flag_read_write() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    assert!(!robot.running());
    robot.set_running(true);
    assert!(robot.running());
    robot.set_running(false);
    assert!(!robot.running());
}

// ============================================================================
// Distance mode
// ============================================================================

#[test]
fn test_distance_issues_one_turn() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    robot
        .move_forward(MotionRequest::distance(15.0).power(75))
        .unwrap();
    assert!(!robot.running());

    let turns = brick.journal().turns();
    assert_eq!(turns.len(), 1);
    let (actuator, power, degrees) = turns[0];
    assert_eq!(actuator, PAIR);
    assert_eq!(power, 75);
    assert_relative_eq!(degrees, 114.591559, epsilon = 1e-5);
}

#[test]
fn test_distance_backward_negates_power() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    robot
        .move_backward(MotionRequest::distance(30.0).power(40))
        .unwrap();

    let turns = brick.journal().turns();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].1, -40);
    assert_relative_eq!(turns[0].2, 229.183118, epsilon = 1e-5);
}

// ============================================================================
// Forever mode and stop
// ============================================================================

#[test]
fn test_forever_runs_until_stop() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    robot.move_forward(MotionRequest::forever()).unwrap();
    assert!(robot.running());
    thread::sleep(Duration::from_millis(20));
    assert!(robot.running());

    robot.stop(true).unwrap();
    assert!(!robot.running());
    assert_eq!(
        brick.journal().events(),
        vec![
            MockEvent::Run {
                actuator: PAIR,
                power: 50
            },
            MockEvent::Idle { actuator: PAIR },
            MockEvent::Brake { actuator: PAIR },
        ]
    );
}

#[test]
fn test_stop_when_idle_is_harmless() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    robot.stop(false).unwrap();
    robot.stop(false).unwrap();
    assert!(!robot.running());
}

#[test]
fn test_stop_without_drive() {
    let brick = MockBrick::shared();
    let robot = Robot::new(brick, test_config()).unwrap();
    assert!(matches!(robot.stop(false), Err(Error::NotInitialized(_))));
    assert!(!robot.running());
}

#[test]
fn test_second_motion_is_busy() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    robot.move_forward(MotionRequest::forever()).unwrap();
    let result = robot.move_backward(MotionRequest::distance(10.0));
    assert!(matches!(result, Err(Error::Busy)));

    // The first motion is untouched
    assert!(robot.running());
    assert_eq!(brick.journal().motor_command_count(), 1);
    robot.stop(false).unwrap();
}

#[test]
fn test_busy_while_other_caller_waits_on_timed_motion() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    thread::scope(|scope| {
        let timed = scope.spawn(|| robot.move_forward(MotionRequest::seconds(0.5).wait()));

        let started = Instant::now();
        while !robot.running() {
            assert!(started.elapsed() < Duration::from_secs(2), "timed motion never started");
            thread::yield_now();
        }

        // Rejected right away, not after the timed motion ends
        let asked = Instant::now();
        let result = robot.move_backward(MotionRequest::distance(5.0));
        assert!(matches!(result, Err(Error::Busy)));
        assert!(asked.elapsed() < Duration::from_millis(200));

        timed.join().unwrap().unwrap();
    });

    assert!(!robot.running());
    assert!(brick.journal().turns().is_empty());
}

#[test]
fn test_stop_handle_from_other_thread() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    robot.move_forward(MotionRequest::forever()).unwrap();
    let handle = robot.stop_handle();
    assert!(handle.is_running());

    thread::spawn(move || handle.stop(false)).join().unwrap().unwrap();
    assert!(!robot.running());
}

// ============================================================================
// Until and timed modes
// ============================================================================

#[test]
fn test_until_with_wait() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    let polls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&polls);
    robot
        .move_forward(
            MotionRequest::until(move || Ok(counter.fetch_add(1, Ordering::SeqCst) >= 5)).wait(),
        )
        .unwrap();

    assert!(!robot.running());
    assert_eq!(polls.load(Ordering::SeqCst), 6);
    let events = brick.journal().events();
    assert_eq!(events.first(), Some(&MockEvent::Run { actuator: PAIR, power: 50 }));
    assert_eq!(events.last(), Some(&MockEvent::Idle { actuator: PAIR }));
}

#[test]
fn test_until_without_wait_runs_in_background() {
    let brick = MockBrick::shared();
    brick.set_pressed(false);
    let mut robot = robot_with_drive(&brick);
    let bumper = robot.init_touch_sensor(brickbot::SensorPort::S1).unwrap();

    robot
        .move_forward(MotionRequest::until(move || bumper.is_pressed()))
        .unwrap();
    assert!(robot.running());

    thread::sleep(Duration::from_millis(20));
    assert!(robot.running());

    brick.set_pressed(true);
    robot.wait_for_motion().unwrap();
    assert!(!robot.running());
}

#[test]
fn test_timed_wait_blocks_for_duration() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    let start = Instant::now();
    robot
        .move_forward(MotionRequest::seconds(0.05).wait())
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(50));
    assert!(!robot.running());
    assert_eq!(
        brick.journal().events(),
        vec![
            MockEvent::Run {
                actuator: PAIR,
                power: 50
            },
            MockEvent::Idle { actuator: PAIR },
        ]
    );
}

#[test]
fn test_stop_cancels_polling_worker() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    robot
        .move_forward(MotionRequest::until(|| Ok(false)))
        .unwrap();
    thread::sleep(Duration::from_millis(20));

    let start = Instant::now();
    robot.stop(false).unwrap();
    robot.wait_for_motion().unwrap();
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(!robot.running());

    // A new motion can start right away
    robot.move_forward(MotionRequest::distance(5.0)).unwrap();
}

#[test]
fn test_predicate_error_reported_on_wait() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    let result = robot.move_forward(
        MotionRequest::until(|| Err(Error::Hardware("sensor unplugged".to_string()))).wait(),
    );
    assert!(matches!(result, Err(Error::Hardware(_))));
    assert!(!robot.running());
}

// ============================================================================
// Spin
// ============================================================================

#[test]
fn test_spin_turns_both_wheels_concurrently() {
    let brick = MockBrick::shared();
    brick.set_turn_duration(Duration::from_millis(100));
    let robot = robot_with_drive(&brick);

    robot.spin(90.0, 40).unwrap();

    let mut turns = brick.journal().turns();
    turns.sort_by_key(|(_, power, _)| *power);
    assert_eq!(
        turns,
        vec![
            (Actuator::Single(MotorPort::C), -40, 90.0),
            (Actuator::Single(MotorPort::A), 40, 90.0),
        ]
    );

    // Both turns start before either finishes
    let events = brick.journal().events();
    let first_finish = events
        .iter()
        .position(|e| matches!(e, MockEvent::TurnFinished { .. }))
        .unwrap();
    let starts_before = events[..first_finish]
        .iter()
        .filter(|e| matches!(e, MockEvent::TurnStarted { .. }))
        .count();
    assert_eq!(starts_before, 2);
}

#[test]
fn test_negative_spin_reverses_wheels() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);

    robot.spin(-180.0, 25).unwrap();

    let turns = brick.journal().turns();
    assert!(turns.contains(&(Actuator::Single(MotorPort::A), -25, 180.0)));
    assert!(turns.contains(&(Actuator::Single(MotorPort::C), 25, 180.0)));
}

#[test]
fn test_spin_reports_wheel_failure() {
    let brick = MockBrick::shared();
    brick.jam(MotorPort::C);
    let robot = robot_with_drive(&brick);

    assert!(matches!(robot.spin(90.0, 40), Err(Error::Hardware(_))));
    // The healthy wheel still completed its turn
    assert!(
        brick
            .journal()
            .events()
            .contains(&MockEvent::TurnFinished {
                actuator: Actuator::Single(MotorPort::A)
            })
    );
}
