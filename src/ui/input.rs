//! Input handling systems
//!
//! Key presses are only queued here; the simulation applies them at the
//! start of its next tick.

use bevy::prelude::*;

use super::components::{SimWorldResource, ViewSettings};
use crate::simulation::{Direction, InputEvent};

const DRIVING_KEYS: [(KeyCode, Direction); 4] = [
    (KeyCode::ArrowUp, Direction::Forward),
    (KeyCode::ArrowLeft, Direction::Left),
    (KeyCode::ArrowRight, Direction::Right),
    (KeyCode::ArrowDown, Direction::Reverse),
];

/// Forward arrow key presses and releases to the simulation's input queue
pub fn queue_driving_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim_world: ResMut<SimWorldResource>,
) {
    for (key, direction) in DRIVING_KEYS {
        if keyboard.just_pressed(key) {
            sim_world.0.push_input(InputEvent::Pressed(direction));
        }
        if keyboard.just_released(key) {
            sim_world.0.push_input(InputEvent::Released(direction));
        }
    }
}

/// Handle basic keyboard input
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut settings: ResMut<ViewSettings>,
    mut exit: MessageWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
    if keyboard.just_pressed(KeyCode::KeyS) {
        settings.show_sensors = !settings.show_sensors;
    }
}
