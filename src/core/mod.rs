//! Core abstractions shared across the crate.
//!
//! - [`types`]: ports, sensor kinds, servo positions and calibration bounds

pub mod types;
