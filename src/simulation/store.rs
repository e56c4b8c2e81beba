//! Particle storage for one simulation run.
//!
//! The store is a pair of flat arrays indexed by particle id. Counts are
//! fixed once the store is built; stages rewrite fields in place.

use bevy::math::Vec2;

/// A moving fluid particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidParticle {
    /// Position in world units
    pub position: Vec2,
    /// One-frame look-ahead, used only as the density sample point
    pub predicted_position: Vec2,
    pub velocity: Vec2,
    /// Density from the last estimate; `0.0` until the first step
    pub density: f32,
    /// Pressure force from the last step (not divided by density)
    pub pressure_force: Vec2,
    /// Collision radius
    pub radius: f32,
}

impl FluidParticle {
    /// Create a particle at rest.
    pub fn at_rest(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            predicted_position: position,
            velocity: Vec2::ZERO,
            density: 0.0,
            pressure_force: Vec2::ZERO,
            radius,
        }
    }
}

/// A static boundary particle with a fixed density.
///
/// Solids bias the density and pressure of nearby fluid but never move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolidParticle {
    pub position: Vec2,
    pub density: f32,
}

/// Owner of all particle state.
#[derive(Clone, Debug, Default)]
pub struct ParticleStore {
    fluid: Vec<FluidParticle>,
    solids: Vec<SolidParticle>,
    /// Host forces queued for the next step, one slot per fluid particle
    pending_forces: Vec<Vec2>,
}

impl ParticleStore {
    pub fn new(fluid: Vec<FluidParticle>, solids: Vec<SolidParticle>) -> Self {
        let pending_forces = vec![Vec2::ZERO; fluid.len()];
        Self {
            fluid,
            solids,
            pending_forces,
        }
    }

    pub fn fluid_count(&self) -> usize {
        self.fluid.len()
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    pub fn fluid(&self) -> &[FluidParticle] {
        &self.fluid
    }

    pub fn fluid_mut(&mut self) -> &mut [FluidParticle] {
        &mut self.fluid
    }

    pub fn solids(&self) -> &[SolidParticle] {
        &self.solids
    }

    pub fn get(&self, index: usize) -> Option<&FluidParticle> {
        self.fluid.get(index)
    }

    /// Add `force` to the queue of particle `index`. Returns `false` if out of range.
    pub fn queue_force(&mut self, index: usize, force: Vec2) -> bool {
        match self.pending_forces.get_mut(index) {
            Some(slot) => {
                *slot += force;
                true
            }
            None => false,
        }
    }

    /// Take every queued force, leaving the queue zeroed.
    pub fn drain_forces(&mut self) -> Vec<Vec2> {
        let drained = self.pending_forces.clone();
        self.pending_forces.fill(Vec2::ZERO);
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_forces_accumulate_and_drain() {
        let mut store = ParticleStore::new(
            vec![FluidParticle::at_rest(Vec2::ZERO, 0.1); 2],
            Vec::new(),
        );
        assert!(store.queue_force(1, Vec2::new(1.0, 0.0)));
        assert!(store.queue_force(1, Vec2::new(2.0, 1.0)));
        assert!(!store.queue_force(2, Vec2::X));

        let drained = store.drain_forces();
        assert_eq!(drained, vec![Vec2::ZERO, Vec2::new(3.0, 1.0)]);
        assert_eq!(store.drain_forces(), vec![Vec2::ZERO; 2]);
    }
}
