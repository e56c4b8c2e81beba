//! Viscous drag between fluid particles.

use bevy::math::Vec2;

use super::kernels::viscosity_kernel;
use super::store::FluidParticle;

/// Kernel-weighted pull of particle `index`'s velocity towards its neighbours'.
///
/// Solids take no part: they have no velocity to diffuse.
pub fn viscosity_force(
    index: usize,
    fluid: &[FluidParticle],
    smoothing_radius: f32,
    strength: f32,
) -> Vec2 {
    let me = &fluid[index];
    let sum: Vec2 = fluid
        .iter()
        .map(|other| {
            let influence = viscosity_kernel(me.position.distance(other.position), smoothing_radius);
            (other.velocity - me.velocity) * influence
        })
        .sum();
    sum * strength
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(x: f32, vx: f32) -> FluidParticle {
        FluidParticle {
            velocity: Vec2::new(vx, 0.0),
            ..FluidParticle::at_rest(Vec2::new(x, 0.0), 0.1)
        }
    }

    #[test]
    fn drag_pulls_towards_neighbour_velocity() {
        let fluid = [moving(0.0, 0.0), moving(0.1, 2.0)];
        let slow = viscosity_force(0, &fluid, 0.5, 0.2);
        let fast = viscosity_force(1, &fluid, 0.5, 0.2);
        assert!(slow.x > 0.0);
        assert!(fast.x < 0.0);
        assert!((slow + fast).length() < 1e-6);
    }

    #[test]
    fn uniform_flow_has_no_drag() {
        let fluid = [moving(0.0, 1.0), moving(0.1, 1.0), moving(0.2, 1.0)];
        assert_eq!(viscosity_force(1, &fluid, 0.5, 0.2), Vec2::ZERO);
    }

    #[test]
    fn particles_at_the_radius_do_not_interact() {
        let fluid = [moving(0.0, 0.0), moving(0.5, 3.0)];
        assert_eq!(viscosity_force(0, &fluid, 0.5, 1.0), Vec2::ZERO);
    }
}
