//! Gizmo rendering of the road, hulls and sensor rays
//!
//! Reads the simulation state and never changes it.

use bevy::prelude::*;

use super::components::{to_screen, MainCamera, SimWorldResource, ViewSettings};
use crate::simulation::{ControlSource, Vehicle};

const DASH_LENGTH: f32 = 20.0;

const BORDER_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);
const LANE_COLOR: Color = Color::srgb(0.85, 0.85, 0.85);
const RAY_COLOR: Color = Color::srgb(1.0, 0.9, 0.1);
const RAY_BLOCKED_COLOR: Color = Color::srgb(0.0, 0.0, 0.0);
const DAMAGED_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);
const TRAFFIC_COLOR: Color = Color::srgb(0.8, 0.2, 0.2);
const AGENT_COLOR: Color = Color::srgb(0.2, 0.4, 0.9);
const PLAYER_COLOR: Color = Color::srgb(0.2, 0.8, 0.3);

/// Draw the border lines and dashed lane lines around the camera
pub fn draw_road(
    mut gizmos: Gizmos,
    sim_world: Res<SimWorldResource>,
    settings: Res<ViewSettings>,
    camera_query: Query<&Transform, With<MainCamera>>,
) {
    let road = &sim_world.0.road;
    let Some(center_y) = camera_query.iter().next().map(|t| t.translation.y) else {
        return;
    };
    // Screen y is the negated simulation y
    let top = (center_y + settings.draw_distance).min(-road.top() as f32);
    let bottom = (center_y - settings.draw_distance).max(-road.bottom() as f32);
    if bottom >= top {
        return;
    }

    let lines = road.lane_line_xs();
    let last = lines.len() - 1;
    for (i, x) in lines.iter().enumerate() {
        let x = *x as f32;
        if i == 0 || i == last {
            gizmos.line_2d(Vec2::new(x, bottom), Vec2::new(x, top), BORDER_COLOR);
            continue;
        }
        // Dashes anchored to world space so they scroll with the road
        let mut y = (bottom / (2.0 * DASH_LENGTH)).floor() * 2.0 * DASH_LENGTH;
        while y < top {
            gizmos.line_2d(Vec2::new(x, y), Vec2::new(x, y + DASH_LENGTH), LANE_COLOR);
            y += 2.0 * DASH_LENGTH;
        }
    }
}

/// Draw every vehicle hull, and the rays of controlled vehicles
pub fn draw_vehicles(
    mut gizmos: Gizmos,
    sim_world: Res<SimWorldResource>,
    settings: Res<ViewSettings>,
) {
    for vehicle in sim_world.0.vehicles() {
        if settings.show_sensors {
            draw_sensors(&mut gizmos, vehicle);
        }
        draw_hull(&mut gizmos, vehicle);
    }
}

fn draw_hull(gizmos: &mut Gizmos, vehicle: &Vehicle) {
    let color = if vehicle.is_damaged() {
        DAMAGED_COLOR
    } else {
        match vehicle.control_source() {
            ControlSource::ConstantForward => TRAFFIC_COLOR,
            ControlSource::Autonomous => AGENT_COLOR,
            ControlSource::Manual => PLAYER_COLOR,
        }
    };
    let hull = vehicle.polygon();
    let closed = hull.iter().chain(hull.first()).map(|p| to_screen(*p));
    gizmos.linestrip_2d(closed, color);
}

/// Yellow up to the nearest hit, black for the part of the ray beyond it
fn draw_sensors(gizmos: &mut Gizmos, vehicle: &Vehicle) {
    for (ray, reading) in vehicle.rays().iter().zip(vehicle.readings()) {
        let start = to_screen(ray.start);
        let end = to_screen(ray.end);
        match reading {
            Some(hit) => {
                let touch = to_screen(hit.point);
                gizmos.line_2d(start, touch, RAY_COLOR);
                gizmos.line_2d(touch, end, RAY_BLOCKED_COLOR);
            }
            None => gizmos.line_2d(start, end, RAY_COLOR),
        }
    }
}
