//! Preset configurations.
//!
//! Pass a scenario name as the first argument of the binary to pick one.

use bevy::math::Vec2;

use crate::resources::{Obstacle, SimulationConfig};

/// Named starting setups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// Weightless block of fluid relaxing inside a lined basin.
    Basin,
    /// Fluid column collapsing under gravity.
    DamBreak,
    /// Falling fluid split by a box obstacle the host can steer.
    Obstacle,
    /// Small blob with no boundary solids, only the domain walls.
    Droplet,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Basin,
        Scenario::DamBreak,
        Scenario::Obstacle,
        Scenario::Droplet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Basin => "basin",
            Scenario::DamBreak => "dam-break",
            Scenario::Obstacle => "obstacle",
            Scenario::Droplet => "droplet",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn config(self) -> SimulationConfig {
        match self {
            Scenario::Basin => SimulationConfig::default(),
            Scenario::DamBreak => SimulationConfig {
                particle_count: 300,
                spacing: 0.2,
                gravity: 9.81,
                velocity_damping: 0.999,
                ..SimulationConfig::default()
            },
            Scenario::Obstacle => SimulationConfig {
                particle_count: 144,
                gravity: 4.0,
                interaction_strength: 8.0,
                obstacles: vec![Obstacle::new(Vec2::new(0.0, -2.4), Vec2::new(0.75, 0.2))],
                ..SimulationConfig::default()
            },
            Scenario::Droplet => SimulationConfig {
                particle_count: 64,
                spacing: 0.15,
                solid_count: 0,
                interaction_strength: 5.0,
                ..SimulationConfig::default()
            },
        }
    }
}
