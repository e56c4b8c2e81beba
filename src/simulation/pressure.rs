//! Equation of state and pairwise pressure forces.

use bevy::math::Vec2;
use rand::Rng;

use super::density::reciprocal;
use super::kernels::density_kernel_derivative;
use super::store::{FluidParticle, SolidParticle};

/// Linear equation of state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EquationOfState {
    pub target_density: f32,
    pub pressure_multiplier: f32,
}

impl EquationOfState {
    /// Pressure is negative below the target density and positive above it.
    #[inline]
    pub fn pressure(&self, density: f32) -> f32 {
        (density - self.target_density) * self.pressure_multiplier
    }

    /// Mean of both pressures, so a pair pushes on each other equally.
    #[inline]
    pub fn shared_pressure(&self, density_a: f32, density_b: f32) -> f32 {
        (self.pressure(density_a) + self.pressure(density_b)) / 2.0
    }
}

/// Uniformly distributed unit vector.
pub fn random_direction<R: Rng>(rng: &mut R) -> Vec2 {
    Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU))
}

/// Inputs shared by every pressure evaluation in a pass.
#[derive(Clone, Copy, Debug)]
pub struct PressureParams {
    pub eos: EquationOfState,
    pub mass: f32,
    pub smoothing_radius: f32,
}

/// Net pressure force on fluid particle `index` from all other fluid
/// particles and every solid.
///
/// Neighbours whose density cannot be divided by are skipped. Coincident
/// neighbours get a random direction drawn from `rng`.
pub fn pressure_force<R: Rng>(
    index: usize,
    fluid: &[FluidParticle],
    solids: &[SolidParticle],
    params: &PressureParams,
    rng: &mut R,
) -> Vec2 {
    let me = &fluid[index];
    let others = fluid
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .map(|(_, p)| (p.position, p.density))
        .chain(solids.iter().map(|s| (s.position, s.density)));

    let mut force = Vec2::ZERO;
    for (position, density) in others {
        let offset = position - me.position;
        let dist = offset.length();
        let slope = density_kernel_derivative(dist, params.smoothing_radius);
        if slope == 0.0 {
            continue;
        }
        let Some(inv_other) = reciprocal(density) else {
            continue;
        };
        let dir = if dist == 0.0 {
            random_direction(rng)
        } else {
            offset / dist
        };
        let shared = params.eos.shared_pressure(density, me.density);
        force += -shared * dir * slope * params.mass * inv_other;
    }
    force
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const EOS: EquationOfState = EquationOfState {
        target_density: 2.75,
        pressure_multiplier: 0.5,
    };

    fn particle(x: f32, y: f32, density: f32) -> FluidParticle {
        FluidParticle {
            density,
            ..FluidParticle::at_rest(Vec2::new(x, y), 0.1)
        }
    }

    #[test]
    fn pressure_sign_follows_density_error() {
        assert!(EOS.pressure(1.0) < 0.0);
        assert_eq!(EOS.pressure(2.75), 0.0);
        assert!(EOS.pressure(4.0) > 0.0);
    }

    #[test]
    fn shared_pressure_is_symmetric() {
        for (a, b) in [(0.0, 1.0), (2.75, 9.0), (100.0, 0.5)] {
            assert_eq!(EOS.shared_pressure(a, b), EOS.shared_pressure(b, a));
        }
    }

    #[test]
    fn compressed_pair_repels() {
        let fluid = [particle(0.0, 0.0, 5.0), particle(0.2, 0.0, 5.0)];
        let params = PressureParams {
            eos: EOS,
            mass: 1.0,
            smoothing_radius: 0.5,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let left = pressure_force(0, &fluid, &[], &params, &mut rng);
        let right = pressure_force(1, &fluid, &[], &params, &mut rng);
        assert!(left.x < 0.0 && right.x > 0.0);
        assert!((left + right).length() < 1e-5);
    }

    #[test]
    fn coincident_particles_get_a_unit_random_direction() {
        let fluid = [particle(0.0, 0.0, 5.0), particle(0.0, 0.0, 5.0)];
        let params = PressureParams {
            eos: EOS,
            mass: 1.0,
            smoothing_radius: 0.5,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let force = pressure_force(0, &fluid, &[], &params, &mut rng);
        let expected = EOS.shared_pressure(5.0, 5.0) * density_kernel_derivative(0.0, 0.5) / 5.0;
        assert!(force.is_finite());
        assert!((force.length() - expected).abs() < 1e-4);
    }

    #[test]
    fn zero_density_neighbour_is_skipped() {
        let fluid = [particle(0.0, 0.0, 5.0), particle(0.1, 0.0, 0.0)];
        let params = PressureParams {
            eos: EOS,
            mass: 1.0,
            smoothing_radius: 0.5,
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pressure_force(0, &fluid, &[], &params, &mut rng), Vec2::ZERO);
    }
}
