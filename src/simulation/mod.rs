//! Simulation module - CPU SPH solver and the plugin that drives it.

pub mod collision;
pub mod density;
pub mod input;
pub mod integrate;
pub mod kernels;
pub mod pressure;
pub mod scenarios;
pub mod setup;
pub mod solver;
pub mod store;
pub mod systems;
pub mod viscosity;

use bevy::prelude::*;

use crate::resources::SimulationConfig;

pub use scenarios::Scenario;
pub use solver::{SolverPhase, SphSolver};
pub use store::{FluidParticle, ParticleStore, SolidParticle};
pub use systems::{FluidSimulation, MAX_FRAME_DT};

/// Plugin that owns the solver and steps it once per frame.
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .add_systems(Startup, systems::initialize_solver)
            .add_systems(
                Update,
                (
                    input::handle_pointer_input,
                    input::handle_obstacle_input,
                    systems::step_solver,
                )
                    .chain(),
            )
            .add_systems(Last, systems::terminate_on_exit);
    }
}
