//! Road Sensor Simulation Library
//!
//! Vehicles on an infinite multi-lane road that sense their surroundings
//! with raycasts. Runs headless or with a Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
