//! Standalone road simulation module
//!
//! This module contains all the core simulation logic (geometry, road,
//! sensors, kinematics and damage) and runs independently of the Bevy game
//! engine. It can be tested via console without booting up the full UI.

mod controls;
mod geometry;
mod policy;
mod road;
mod sensor;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
pub use controls::{ControlSignals, ControlSource, Direction, InputEvent, InputQueue};
pub use geometry::{edges, intersect, lerp, polygons_intersect};
pub use policy::{FnPolicy, Policy, ReflexPolicy};
pub use road::Road;
pub use sensor::{SensorArray, SensorConfig};
#[allow(unused_imports)]
pub use types::{
    Intersection, Point, Polygon, Segment, SimId, VehicleId, CAR_HEIGHT, CAR_WIDTH,
    DEFAULT_ACCELERATION, DEFAULT_FRICTION, DEFAULT_LANE_COUNT, DEFAULT_MAX_SPEED,
    DEFAULT_RAY_COUNT, DEFAULT_RAY_LENGTH, DEFAULT_RAY_SPREAD, DEFAULT_ROAD_WIDTH,
    DEFAULT_TURN_RATE, PARALLEL_EPSILON, POLICY_ACTIVATION_THRESHOLD, ROAD_EXTENT,
    TRAFFIC_MAX_SPEED,
};
pub use vehicle::{Vehicle, VehicleConfig};
pub use world::{ScenarioConfig, SimWorld};
