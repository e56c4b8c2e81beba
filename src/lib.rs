//! Tidepool SPH Simulation Library
//!
//! A 2D Smoothed Particle Hydrodynamics solver with a Bevy host. The solver
//! in [`simulation`] is usable on its own through `SphSolver`.

pub mod error;
pub mod render;
pub mod resources;
pub mod simulation;

pub use error::{Error, Result};
