//! Particle rendering - debug drawing of the fluid state with gizmos.

use bevy::math::Isometry2d;
use bevy::prelude::*;

use crate::simulation::FluidSimulation;

/// Density that maps to the hottest fluid color.
const DENSITY_COLOR_RANGE: f32 = 2.0;

/// Plugin for drawing particles, solids, obstacles and the domain box.
pub struct ParticleRenderPlugin;

impl Plugin for ParticleRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, draw_simulation);
    }
}

/// Blue at rest density, shading to white as the particle compresses.
fn density_color(density: f32, target: f32) -> Color {
    let t = if target > 0.0 {
        ((density / target - 1.0) / DENSITY_COLOR_RANGE).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Color::srgb(0.15 + 0.85 * t, 0.45 + 0.55 * t, 1.0)
}

fn draw_simulation(mut gizmos: Gizmos, sim: Option<Res<FluidSimulation>>) {
    let Some(sim) = sim else {
        return;
    };
    let solver = &sim.0;
    let config = solver.config();

    gizmos.rect_2d(
        Isometry2d::IDENTITY,
        config.bounds,
        Color::srgb(0.6, 0.6, 0.6),
    );

    for obstacle in solver.obstacles() {
        gizmos.rect_2d(
            Isometry2d::from_translation(obstacle.center),
            obstacle.size(),
            Color::srgb(1.0, 0.5, 0.2),
        );
    }

    for solid in solver.solid_particles() {
        gizmos.circle_2d(
            Isometry2d::from_translation(solid.position),
            config.solid_radius,
            Color::srgb(0.4, 0.4, 0.4),
        );
    }

    for p in solver.snapshot() {
        gizmos.circle_2d(
            Isometry2d::from_translation(Vec2::from_array(p.pos)),
            config.particle_radius,
            density_color(p.density, config.target_density),
        );
    }

    if let Some(interaction) = solver.interaction() {
        gizmos.circle_2d(
            Isometry2d::from_translation(interaction.point),
            config.interaction_radius,
            Color::srgb(0.9, 0.9, 0.2),
        );
    }
}
