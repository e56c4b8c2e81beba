//! Semi-implicit Euler integration and the host interaction force.

use bevy::math::Vec2;

use crate::resources::Interaction;

/// Gravity pulls along -y.
#[inline]
pub fn apply_gravity(velocity: Vec2, gravity: f32, dt: f32) -> Vec2 {
    velocity + Vec2::NEG_Y * gravity * dt
}

/// Look-ahead position used as the density sample point.
#[inline]
pub fn predict(position: Vec2, velocity: Vec2, dt: f32) -> Vec2 {
    position + velocity * dt
}

/// Velocity first, then position from the new velocity.
#[inline]
pub fn integrate(position: &mut Vec2, velocity: &mut Vec2, acceleration: Vec2, dt: f32) {
    *velocity += acceleration * dt;
    *position += *velocity * dt;
}

/// Acceleration pulling a particle towards (or, with negative strength,
/// away from) the interaction point, fading out linearly at `radius`.
pub fn interaction_acceleration(
    interaction: &Interaction,
    radius: f32,
    position: Vec2,
    velocity: Vec2,
) -> Vec2 {
    let offset = interaction.point - position;
    let dist_sq = offset.length_squared();
    if dist_sq >= radius * radius {
        return Vec2::ZERO;
    }
    let dist = dist_sq.sqrt();
    let dir = if dist <= f32::EPSILON {
        Vec2::ZERO
    } else {
        offset / dist
    };
    let centre_t = 1.0 - dist / radius;
    (dir * interaction.strength - velocity) * centre_t
}
