//! Bevy systems driving the solver from the host frame loop.

use bevy::prelude::*;

use super::solver::SphSolver;
use crate::resources::SimulationConfig;

/// Largest time step handed to the solver in one frame. Longer frames
/// (window drags, debugger pauses) are clamped to keep the fluid stable.
pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

/// The running solver, owned by the ECS world.
#[derive(Resource)]
pub struct FluidSimulation(pub SphSolver);

/// Build the solver from the configured parameters.
pub fn initialize_solver(mut commands: Commands, config: Res<SimulationConfig>) {
    match SphSolver::initialize(config.clone()) {
        Ok(solver) => commands.insert_resource(FluidSimulation(solver)),
        Err(e) => error!("Failed to initialize fluid simulation: {e}"),
    }
}

/// Advance the solver by this frame's delta.
pub fn step_solver(time: Res<Time>, sim: Option<ResMut<FluidSimulation>>) {
    let Some(mut sim) = sim else {
        return;
    };
    let dt = time.delta_secs().min(MAX_FRAME_DT);
    if let Err(e) = sim.0.step(dt) {
        error!("Fluid step failed: {e}");
    }
}

/// Move the solver into its terminal state when the app shuts down.
pub fn terminate_on_exit(
    mut exit_events: EventReader<AppExit>,
    sim: Option<ResMut<FluidSimulation>>,
) {
    if exit_events.read().next().is_none() {
        return;
    }
    if let Some(mut sim) = sim {
        sim.0.terminate();
    }
}
