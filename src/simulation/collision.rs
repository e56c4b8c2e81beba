//! Collision response against the domain box and solid obstacles.
//!
//! Both checks run after integration. Velocity components along the hit axis
//! are reflected inward and scaled by the damping coefficient.

use bevy::math::Vec2;

use crate::resources::Obstacle;

/// Clamp a particle into the domain of full size `bounds`, inset by `radius`.
///
/// Each axis is handled on its own, so a corner hit clamps both.
pub fn resolve_bounds(
    position: &mut Vec2,
    velocity: &mut Vec2,
    bounds: Vec2,
    radius: f32,
    damping: f32,
) {
    let half = bounds / 2.0 - Vec2::splat(radius);

    if position.x > half.x {
        position.x = half.x;
        velocity.x = -damping * velocity.x.abs();
    } else if position.x < -half.x {
        position.x = -half.x;
        velocity.x = damping * velocity.x.abs();
    }

    if position.y > half.y {
        position.y = half.y;
        velocity.y = -damping * velocity.y.abs();
    } else if position.y < -half.y {
        position.y = -half.y;
        velocity.y = damping * velocity.y.abs();
    }
}

/// Side of an obstacle a particle is pushed out through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Bottom,
    Top,
}

/// Push a particle out of `obstacle` if its inflated disc overlaps it.
///
/// Exits along the side of least penetration; ties go to the earlier of
/// left, right, bottom, top. Both velocity components are reversed and
/// damped. Returns the exit side when a collision happened.
pub fn resolve_obstacle(
    position: &mut Vec2,
    velocity: &mut Vec2,
    obstacle: &Obstacle,
    radius: f32,
    damping: f32,
) -> Option<Side> {
    let min = obstacle.min();
    let max = obstacle.max();

    let penetrations = [
        (Side::Left, position.x + radius - min.x),
        (Side::Right, max.x - position.x + radius),
        (Side::Bottom, position.y + radius - min.y),
        (Side::Top, max.y - position.y + radius),
    ];
    if penetrations.iter().any(|&(_, depth)| depth < 0.0) {
        return None;
    }

    // `min_by` keeps the first of equal elements.
    let (side, _) = penetrations
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    match side {
        Side::Left => position.x = min.x - radius,
        Side::Right => position.x = max.x + radius,
        Side::Bottom => position.y = min.y - radius,
        Side::Top => position.y = max.y + radius,
    }
    *velocity *= -damping;
    Some(side)
}
