//! Route recording and retrace tests
//!
//! Run with: `cargo test --test route`

use approx::assert_relative_eq;
use brickbot::devices::mock::{Actuator, MockBrick};
use brickbot::{BrickbotConfig, Movement, MotorPort, Robot, Route};
use std::sync::Arc;

fn robot_with_drive(brick: &Arc<MockBrick>) -> Robot {
    let mut robot = Robot::new(brick.clone(), BrickbotConfig::default()).unwrap();
    robot.init_drive(MotorPort::A, MotorPort::C).unwrap();
    robot
}

#[test]
fn test_records_successful_movements() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);
    let mut route = Route::new();

    route.forward(&robot, 15.0).unwrap();
    route.turn_right(&robot, 30, 90.0).unwrap();
    route.forward(&robot, 10.0).unwrap();

    assert_eq!(
        route.movements(),
        &[
            Movement::Step(15.0),
            Movement::RightTurn(90.0),
            Movement::Step(10.0)
        ]
    );
}

#[test]
fn test_failed_movement_not_recorded() {
    let brick = MockBrick::shared();
    let robot = Robot::new(brick, BrickbotConfig::default()).unwrap();
    let mut route = Route::new();

    assert!(route.forward(&robot, 15.0).is_err());
    assert!(route.turn_left(&robot, 30, 90.0).is_err());
    assert!(route.is_empty());
}

#[test]
fn test_retrace_undoes_in_reverse() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);
    let mut route = Route::new();

    route.forward(&robot, 15.0).unwrap();
    route.turn_right(&robot, 30, 90.0).unwrap();
    brick.journal().clear();

    route.retrace(&robot, 40).unwrap();
    assert!(route.is_empty());

    let turns = brick.journal().turns();
    assert_eq!(turns.len(), 2);
    // Right turn undone on the right wheel
    assert_eq!(turns[0], (Actuator::Single(MotorPort::C), 40, 90.0));
    // Step undone backwards
    let (actuator, power, degrees) = turns[1];
    assert_eq!(actuator, Actuator::Pair(MotorPort::A, MotorPort::C));
    assert_eq!(power, -40);
    assert_relative_eq!(degrees, 114.591559, epsilon = 1e-5);
}

#[test]
fn test_retrace_failure_keeps_remaining() {
    let brick = MockBrick::shared();
    let robot = robot_with_drive(&brick);
    let mut route = Route::new();

    route.forward(&robot, 15.0).unwrap();
    route.turn_right(&robot, 30, 90.0).unwrap();
    brick.jam(MotorPort::C);

    assert!(route.retrace(&robot, 40).is_err());
    assert_eq!(route.len(), 2);

    brick.clear_faults();
    route.retrace(&robot, 40).unwrap();
    assert!(route.is_empty());
}
