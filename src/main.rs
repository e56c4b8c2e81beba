//! Tidepool - Main Entry
//!
//! A 2D SPH fluid in a lined box. Pass a scenario name (`basin`,
//! `dam-break`, `obstacle`, `droplet`) as the first argument.

use bevy::prelude::*;
use tidepool::render::ParticleRenderPlugin;
use tidepool::simulation::{Scenario, SimulationPlugin};

/// World units visible per screen pixel.
const CAMERA_SCALE: f32 = 1.0 / 110.0;

/// Frames between heartbeat log lines.
const LOG_INTERVAL_FRAMES: u32 = 600;

fn main() {
    let scenario = std::env::args()
        .nth(1)
        .and_then(|name| Scenario::from_name(&name))
        .unwrap_or(Scenario::Basin);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: format!("Tidepool SPH ({})", scenario.name()),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(SimulationPlugin::new(scenario.config()))
        .add_plugins(ParticleRenderPlugin)
        .add_systems(Startup, setup_camera)
        .add_systems(Update, log_frame)
        .run();
}

/// Set up the 2D main camera, zoomed so the domain fills the window
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scale: CAMERA_SCALE,
            ..OrthographicProjection::default_2d()
        },
    ));
    commands.insert_resource(FrameCounter(0));
}

/// Frame counter for logging
#[derive(Resource)]
struct FrameCounter(u32);

/// Log every N frames
fn log_frame(mut counter: ResMut<FrameCounter>) {
    counter.0 += 1;
    if counter.0 % LOG_INTERVAL_FRAMES == 0 {
        info!("Frame {}: Simulation running...", counter.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_counter_advances_once_per_update() {
        let mut app = App::new();
        app.insert_resource(FrameCounter(LOG_INTERVAL_FRAMES - 1))
            .add_systems(Update, log_frame);
        app.update();
        assert_eq!(app.world().resource::<FrameCounter>().0, LOG_INTERVAL_FRAMES);
    }
}
