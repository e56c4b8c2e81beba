//! SPH solver loop.
//!
//! Every call to [`SphSolver::step`] runs four passes over the fluid, each
//! finishing for all particles before the next begins:
//!
//! 1. Gravity, position prediction and density estimation
//! 2. Viscosity force -> velocity
//! 3. Pressure force (stored, not applied)
//! 4. Pressure, interaction and queued host forces -> velocity, position,
//!    then collision response
//!
//! Within a pass no particle reads another particle's output from the same
//! pass, so each pass could run in parallel behind a barrier.

use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use super::collision::{resolve_bounds, resolve_obstacle};
use super::density::{estimate_density, reciprocal};
use super::integrate::{apply_gravity, integrate, interaction_acceleration, predict};
use super::pressure::{pressure_force, EquationOfState, PressureParams};
use super::setup;
use super::store::{FluidParticle, ParticleStore, SolidParticle};
use super::viscosity::viscosity_force;
use crate::error::{Error, Result};
use crate::resources::{Interaction, Obstacle, ParticleSnapshot, SimulationConfig};

/// Lifecycle of a solver. Construction is the `Uninitialized -> Initialized` edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverPhase {
    /// Particles placed, no step taken yet
    Initialized,
    /// At least one step completed
    Stepping,
    /// No further steps allowed
    Terminated,
}

/// Brute-force all-pairs SPH solver.
pub struct SphSolver {
    config: SimulationConfig,
    store: ParticleStore,
    obstacles: Vec<Obstacle>,
    interaction: Option<Interaction>,
    rng: StdRng,
    phase: SolverPhase,
    steps: u64,
}

impl SphSolver {
    /// Validate `config` and place particles with the default layout.
    pub fn initialize(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let (fluid, solids) = setup::layout(&config);
        Self::from_layout(config, fluid, solids)
    }

    /// Validate `config` and place particles at explicit positions.
    ///
    /// `fluid` must hold exactly `config.particle_count` positions, each
    /// inside the domain and clear of every obstacle, so that a first
    /// `step(0.0)` moves nothing. `solids` may hold any number and overrides
    /// `config.solid_count`.
    pub fn from_layout(
        mut config: SimulationConfig,
        fluid: Vec<Vec2>,
        solids: Vec<Vec2>,
    ) -> Result<Self> {
        if fluid.len() != config.particle_count {
            return Err(Error::LayoutMismatch {
                expected: config.particle_count,
                actual: fluid.len(),
            });
        }
        config.solid_count = solids.len();
        config.validate()?;
        check_fluid_layout(&config, &fluid)?;

        let fluid = fluid
            .into_iter()
            .map(|p| FluidParticle::at_rest(p, config.particle_radius))
            .collect();
        let solids = solids
            .into_iter()
            .map(|position| SolidParticle {
                position,
                density: config.target_density,
            })
            .collect();
        let store = ParticleStore::new(fluid, solids);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "SPH solver ready: {} fluid, {} solid, {} obstacles",
            store.fluid_count(),
            store.solid_count(),
            config.obstacles.len()
        );

        Ok(Self {
            obstacles: config.obstacles.clone(),
            config,
            store,
            interaction: None,
            rng,
            phase: SolverPhase::Initialized,
            steps: 0,
        })
    }

    /// Advance the simulation by `dt` seconds. `dt == 0` recomputes
    /// densities and pressure forces without moving anything.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if self.phase == SolverPhase::Terminated {
            return Err(Error::Terminated);
        }
        if !dt.is_finite() || dt < 0.0 {
            return Err(Error::InvalidTimeStep(dt));
        }

        self.predict_and_estimate_density(dt);
        let mut skipped = self.apply_viscosity(dt);
        self.compute_pressure_forces();
        skipped += self.apply_forces_and_collide(dt);

        if skipped > 0 {
            warn!(
                "step {}: skipped {} force applications on particles with near-zero density",
                self.steps, skipped
            );
        }

        self.steps += 1;
        self.phase = SolverPhase::Stepping;
        trace!("step {} done (dt = {})", self.steps, dt);
        Ok(())
    }

    /// Pass 1.
    fn predict_and_estimate_density(&mut self, dt: f32) {
        let damping = if dt > 0.0 {
            self.config.velocity_damping
        } else {
            1.0
        };
        for p in self.store.fluid_mut() {
            p.velocity = apply_gravity(p.velocity * damping, self.config.gravity, dt);
            p.predicted_position = predict(p.position, p.velocity, dt);
        }

        let densities: Vec<f32> = self
            .store
            .fluid()
            .iter()
            .map(|p| {
                estimate_density(
                    p.predicted_position,
                    self.store.fluid(),
                    self.store.solids(),
                    self.config.particle_mass,
                    self.config.smoothing_radius,
                )
            })
            .collect();

        for (p, density) in self.store.fluid_mut().iter_mut().zip(densities) {
            p.density = density;
        }
    }

    /// Pass 2.
    fn apply_viscosity(&mut self, dt: f32) -> usize {
        let fluid = self.store.fluid();
        let forces: Vec<Vec2> = (0..fluid.len())
            .map(|i| {
                viscosity_force(
                    i,
                    fluid,
                    self.config.smoothing_radius,
                    self.config.viscosity_strength,
                )
            })
            .collect();

        let mut skipped = 0;
        for (p, force) in self.store.fluid_mut().iter_mut().zip(forces) {
            match reciprocal(p.density) {
                Some(inv) => p.velocity += force * inv * dt,
                None => skipped += usize::from(force != Vec2::ZERO),
            }
        }
        skipped
    }

    /// Pass 3.
    fn compute_pressure_forces(&mut self) {
        let params = PressureParams {
            eos: self.eos(),
            mass: self.config.particle_mass,
            smoothing_radius: self.config.smoothing_radius,
        };
        let fluid = self.store.fluid();
        let solids = self.store.solids();
        let rng = &mut self.rng;
        let forces: Vec<Vec2> = (0..fluid.len())
            .map(|i| pressure_force(i, fluid, solids, &params, &mut *rng))
            .collect();

        for (p, force) in self.store.fluid_mut().iter_mut().zip(forces) {
            p.pressure_force = force;
        }
    }

    /// Pass 4.
    fn apply_forces_and_collide(&mut self, dt: f32) -> usize {
        let external = self.store.drain_forces();
        let interaction = self.interaction;
        let config = &self.config;
        let obstacles = &self.obstacles;

        let mut skipped = 0;
        for (p, host_force) in self.store.fluid_mut().iter_mut().zip(external) {
            let mut acceleration = Vec2::ZERO;
            let force = p.pressure_force + host_force;
            match reciprocal(p.density) {
                Some(inv) => acceleration += force * inv,
                None => skipped += usize::from(force != Vec2::ZERO),
            }
            if let Some(interaction) = &interaction {
                acceleration += interaction_acceleration(
                    interaction,
                    config.interaction_radius,
                    p.position,
                    p.velocity,
                );
            }

            integrate(&mut p.position, &mut p.velocity, acceleration, dt);

            resolve_bounds(
                &mut p.position,
                &mut p.velocity,
                config.bounds,
                p.radius,
                config.collision_damping,
            );
            for obstacle in obstacles {
                resolve_obstacle(
                    &mut p.position,
                    &mut p.velocity,
                    obstacle,
                    p.radius,
                    config.collision_damping,
                );
            }
        }
        skipped
    }

    /// Queue `force` on particle `index` for the next step.
    ///
    /// It is converted to acceleration with that step's density and scaled
    /// by its `dt`. Repeated calls between steps add up.
    pub fn apply_external_force(&mut self, index: usize, force: Vec2) -> Result<()> {
        if !force.is_finite() {
            return Err(Error::InvalidInput(format!(
                "force {force} on particle {index} is not finite"
            )));
        }
        if self.store.queue_force(index, force) {
            Ok(())
        } else {
            Err(Error::ParticleIndexOutOfRange {
                index,
                count: self.store.fluid_count(),
            })
        }
    }

    /// Set or clear the pointer interaction used by subsequent steps.
    ///
    /// A non-finite point or strength is rejected and the previous
    /// interaction is kept.
    pub fn set_interaction(&mut self, interaction: Option<Interaction>) -> Result<()> {
        if let Some(interaction) = &interaction {
            if !interaction.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "interaction {interaction:?} is not finite"
                )));
            }
        }
        self.interaction = interaction;
        Ok(())
    }

    pub fn interaction(&self) -> Option<Interaction> {
        self.interaction
    }

    /// Stop the solver. Later calls to `step` fail with [`Error::Terminated`].
    pub fn terminate(&mut self) {
        if self.phase != SolverPhase::Terminated {
            info!("SPH solver terminated after {} steps", self.steps);
        }
        self.phase = SolverPhase::Terminated;
    }

    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn eos(&self) -> EquationOfState {
        EquationOfState {
            target_density: self.config.target_density,
            pressure_multiplier: self.config.pressure_multiplier,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.store.fluid_count()
    }

    pub fn solid_count(&self) -> usize {
        self.store.solid_count()
    }

    /// Position of particle `index`, or `Vec2::ZERO` when out of range.
    ///
    /// Lenient on purpose for render loops; use [`Self::try_particle_position`]
    /// to detect bad indices.
    pub fn particle_position(&self, index: usize) -> Vec2 {
        self.try_particle_position(index).unwrap_or(Vec2::ZERO)
    }

    pub fn try_particle_position(&self, index: usize) -> Option<Vec2> {
        self.store.get(index).map(|p| p.position)
    }

    pub fn particle_velocity(&self, index: usize) -> Option<Vec2> {
        self.store.get(index).map(|p| p.velocity)
    }

    pub fn particle_density(&self, index: usize) -> Option<f32> {
        self.store.get(index).map(|p| p.density)
    }

    /// Pressure force computed in the last step.
    pub fn pressure_force(&self, index: usize) -> Option<Vec2> {
        self.store.get(index).map(|p| p.pressure_force)
    }

    pub fn fluid_particles(&self) -> &[FluidParticle] {
        self.store.fluid()
    }

    pub fn solid_particles(&self) -> &[SolidParticle] {
        self.store.solids()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacle(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }

    /// Move obstacle `index` to `center` before the next step. Extents are
    /// fixed at initialization.
    pub fn set_obstacle_center(&mut self, index: usize, center: Vec2) -> Result<()> {
        if !center.is_finite() {
            return Err(Error::InvalidInput(format!(
                "obstacle center {center} is not finite"
            )));
        }
        let count = self.obstacles.len();
        let obstacle = self
            .obstacles
            .get_mut(index)
            .ok_or(Error::ObstacleIndexOutOfRange { index, count })?;
        obstacle.center = center;
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<ParticleSnapshot> {
        self.store
            .fluid()
            .iter()
            .map(|p| ParticleSnapshot::new(p.position, p.velocity, p.density))
            .collect()
    }

    /// Snapshot as raw bytes, ready for a storage buffer.
    pub fn snapshot_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.snapshot()).to_vec()
    }
}

/// Reject fluid positions that the first collision pass would move.
fn check_fluid_layout(config: &SimulationConfig, fluid: &[Vec2]) -> Result<()> {
    let half = config.bounds / 2.0 - Vec2::splat(config.particle_radius);
    for (i, &position) in fluid.iter().enumerate() {
        if !position.abs().cmple(half).all() {
            return Err(Error::InvalidConfig(format!(
                "fluid particle {i} at {position} lies outside the {} domain \
                 (particle_count {}, spacing {})",
                config.bounds, config.particle_count, config.spacing
            )));
        }
        if let Some(k) = config
            .obstacles
            .iter()
            .position(|o| o.overlaps(position, config.particle_radius))
        {
            return Err(Error::InvalidConfig(format!(
                "fluid particle {i} at {position} starts inside obstacle {k}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config(particle_count: usize) -> SimulationConfig {
        SimulationConfig {
            particle_count,
            solid_count: 0,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn phases_progress_and_terminate() {
        let mut solver = SphSolver::initialize(quiet_config(16)).unwrap();
        assert_eq!(solver.phase(), SolverPhase::Initialized);
        solver.step(0.01).unwrap();
        assert_eq!(solver.phase(), SolverPhase::Stepping);
        solver.terminate();
        assert!(matches!(solver.step(0.01), Err(Error::Terminated)));
        assert_eq!(solver.steps(), 1);
    }

    #[test]
    fn rejects_bad_time_steps() {
        let mut solver = SphSolver::initialize(quiet_config(4)).unwrap();
        for dt in [-0.01, f32::NAN, f32::INFINITY] {
            assert!(matches!(solver.step(dt), Err(Error::InvalidTimeStep(_))));
        }
        assert_eq!(solver.phase(), SolverPhase::Initialized);
    }

    #[test]
    fn layout_length_must_match() {
        let result = SphSolver::from_layout(quiet_config(3), vec![Vec2::ZERO; 2], Vec::new());
        assert!(matches!(
            result,
            Err(Error::LayoutMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn out_of_range_queries_are_lenient_but_forces_are_not() {
        let mut solver = SphSolver::initialize(quiet_config(4)).unwrap();
        assert_eq!(solver.particle_position(99), Vec2::ZERO);
        assert_eq!(solver.try_particle_position(99), None);
        assert!(matches!(
            solver.apply_external_force(4, Vec2::X),
            Err(Error::ParticleIndexOutOfRange { index: 4, count: 4 })
        ));
    }

    #[test]
    fn snapshot_bytes_match_particle_count() {
        let solver = SphSolver::initialize(quiet_config(10)).unwrap();
        let bytes = solver.snapshot_bytes();
        assert_eq!(bytes.len(), 10 * std::mem::size_of::<ParticleSnapshot>());
        let back: &[ParticleSnapshot] = bytemuck::cast_slice(&bytes);
        assert_eq!(back[3].pos, solver.particle_position(3).to_array());
    }

    #[test]
    fn forces_on_unsupported_particles_are_skipped() {
        let mut solver =
            SphSolver::from_layout(quiet_config(1), vec![Vec2::ZERO], Vec::new()).unwrap();
        // Kick hard enough that the wall bounce outruns the kernel support.
        solver.apply_external_force(0, Vec2::new(1.0e4, 0.0)).unwrap();
        solver.step(0.1).unwrap();
        let bounced = solver.particle_velocity(0).unwrap();
        assert!(bounced.x < 0.0);

        solver.apply_external_force(0, Vec2::new(1.0, 0.0)).unwrap();
        solver.step(0.1).unwrap();
        assert_eq!(solver.particle_density(0), Some(0.0));
        assert_eq!(solver.particle_velocity(0), Some(bounced));
        assert!(solver.particle_position(0).is_finite());
    }
}
