//! UI components and resources for linking Bevy to the simulation state

use bevy::prelude::*;

use crate::simulation::{Point, SimWorld};

/// Resource wrapper for the simulation world
#[derive(Resource)]
pub struct SimWorldResource(pub SimWorld);

impl Default for SimWorldResource {
    fn default() -> Self {
        Self(SimWorld::create_test_world())
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// How much of the road around the camera gets drawn
#[derive(Resource)]
pub struct ViewSettings {
    /// Half-height of the drawn stretch of road, in world units
    pub draw_distance: f32,
    /// Draw the sensor rays of controlled vehicles
    pub show_sensors: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            draw_distance: 800.0,
            show_sensors: true,
        }
    }
}

/// Simulation coordinates grow downwards; Bevy's y axis grows upwards
pub fn to_screen(point: Point) -> Vec2 {
    Vec2::new(point.x as f32, -point.y as f32)
}
