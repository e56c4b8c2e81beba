//! Density estimation.

use bevy::math::Vec2;

use super::kernels::density_kernel;
use super::store::{FluidParticle, SolidParticle};

/// Densities at or below this value count as "no support" and are never divided by.
pub const MIN_DENSITY: f32 = f32::EPSILON;

/// Sum of kernel-weighted mass from every fluid and solid particle at `point`.
///
/// Fluid particles contribute from their current position, not their
/// predicted one; only the query point looks ahead.
pub fn estimate_density(
    point: Vec2,
    fluid: &[FluidParticle],
    solids: &[SolidParticle],
    mass: f32,
    smoothing_radius: f32,
) -> f32 {
    let fluid_sum: f32 = fluid
        .iter()
        .map(|p| density_kernel(p.position.distance(point), smoothing_radius))
        .sum();
    let solid_sum: f32 = solids
        .iter()
        .map(|s| density_kernel(s.position.distance(point), smoothing_radius))
        .sum();
    mass * (fluid_sum + solid_sum)
}

/// `1 / density`, or `None` when the density is too small to divide by.
#[inline]
pub fn reciprocal(density: f32) -> Option<f32> {
    (density.is_finite() && density > MIN_DENSITY).then(|| density.recip())
}
