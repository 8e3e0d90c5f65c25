//! Systems that advance the simulation and keep the camera on it

use bevy::prelude::*;

use super::components::{to_screen, MainCamera, SimWorldResource};

/// System to run simulation tick
pub fn tick_simulation(mut sim_world: ResMut<SimWorldResource>) {
    sim_world.0.tick();
}

/// Keep the camera centred on the road, slightly behind the best agent
pub fn follow_best_agent(
    sim_world: Res<SimWorldResource>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let world = &sim_world.0;
    let Some(best) = world.best_agent() else {
        return;
    };
    let focus = to_screen(best.position());
    let road_x = world.road.x as f32;

    for mut transform in &mut camera_query {
        transform.translation.x = road_x;
        // Show more road ahead of the vehicle than behind it
        transform.translation.y = focus.y + 200.0;
    }
}
