//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI reads state from `SimWorld`, draws it with 2D gizmos and feeds
//! keyboard events into the simulation's input queue.

mod components;
mod draw;
mod input;
mod sync;

use bevy::prelude::*;

pub use components::{SimWorldResource, ViewSettings};

use components::MainCamera;
use draw::{draw_road, draw_vehicles};
use input::{handle_input, queue_driving_input};
use sync::{follow_best_agent, tick_simulation};

/// Simulation ticks per second
const TICK_RATE_HZ: f64 = 60.0;

/// Plugin to register all UI systems
pub struct RoadSimUIPlugin;

impl Plugin for RoadSimUIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimWorldResource>()
            .init_resource::<ViewSettings>()
            .insert_resource(ClearColor(Color::srgb(0.3, 0.3, 0.3)))
            .insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ))
            .add_systems(Startup, setup_camera)
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    queue_driving_input,
                    handle_input,
                    follow_best_agent,
                    (draw_road, draw_vehicles).after(follow_best_agent),
                ),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((MainCamera, Camera2d));
}
