//! Input handling for pointer interaction and obstacle control.
//!
//! Left mouse button pulls fluid towards the cursor, right button pushes it
//! away. Arrow keys / WASD move the first obstacle.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::systems::FluidSimulation;
use crate::resources::Interaction;

/// Obstacle speed in world units per second.
const OBSTACLE_SPEED: f32 = 2.0;

/// Map mouse buttons and cursor position to the solver's interaction point.
pub fn handle_pointer_input(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    sim: Option<ResMut<FluidSimulation>>,
) {
    let Some(mut sim) = sim else {
        return;
    };

    let sign = if buttons.pressed(MouseButton::Left) {
        1.0
    } else if buttons.pressed(MouseButton::Right) {
        -1.0
    } else {
        0.0
    };
    let point = cursor_world_position(&windows, &cameras);

    let interaction = match point {
        Some(point) if sign != 0.0 => Some(Interaction {
            point,
            strength: sign * sim.0.config().interaction_strength,
        }),
        _ => None,
    };
    if let Err(err) = sim.0.set_interaction(interaction) {
        warn!("ignoring pointer input: {err}");
    }
}

fn cursor_world_position(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let window = windows.get_single().ok()?;
    let cursor = window.cursor_position()?;
    let (camera, transform) = cameras.get_single().ok()?;
    camera.viewport_to_world_2d(transform, cursor).ok()
}

/// Move obstacle 0 with the keyboard.
pub fn handle_obstacle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    sim: Option<ResMut<FluidSimulation>>,
) {
    let Some(mut sim) = sim else {
        return;
    };

    let mut direction = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        direction.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        direction.x += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        direction.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        direction.y += 1.0;
    }
    if direction == Vec2::ZERO {
        return;
    }

    let half_bounds = sim.0.config().bounds / 2.0;
    let Some(&obstacle) = sim.0.obstacle(0) else {
        return;
    };
    let limit = (half_bounds - obstacle.half_extents).max(Vec2::ZERO);
    let center = (obstacle.center + direction * OBSTACLE_SPEED * time.delta_secs())
        .clamp(-limit, limit);
    if let Err(err) = sim.0.set_obstacle_center(0, center) {
        warn!("ignoring obstacle input: {err}");
    }
}
