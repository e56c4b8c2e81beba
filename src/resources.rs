//! Configuration and host-facing data structures.
//!
//! `ParticleSnapshot` uses `#[repr(C)]` and implements `Pod`/`Zeroable` so a
//! renderer can upload the fluid state as a flat buffer.

use bevy::math::Vec2;
use bevy::prelude::Resource;
use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};

/// Axis-aligned rectangular obstacle the fluid collides with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Obstacle {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    /// True when a disc of `radius` at `position` reaches strictly inside.
    pub fn overlaps(&self, position: Vec2, radius: f32) -> bool {
        let reach = self.half_extents + Vec2::splat(radius);
        (position - self.center).abs().cmplt(reach).all()
    }
}

/// Pointer-driven interaction point. Positive strength attracts, negative repels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interaction {
    pub point: Vec2,
    pub strength: f32,
}

impl Interaction {
    pub fn is_finite(&self) -> bool {
        self.point.is_finite() && self.strength.is_finite()
    }
}

/// Everything needed to set up and run one simulation.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of fluid particles
    pub particle_count: usize,
    /// Grid spacing of the initial fluid layout
    pub spacing: f32,
    /// Gravity magnitude along -y
    pub gravity: f32,
    pub target_density: f32,
    /// Kernel support radius (h)
    pub smoothing_radius: f32,
    /// Slope of the linear equation of state
    pub pressure_multiplier: f32,
    pub viscosity_strength: f32,
    /// Full width and height of the domain, centered on the origin
    pub bounds: Vec2,
    /// Fraction of speed kept after a wall or obstacle hit (0-1)
    pub collision_damping: f32,
    /// Uniform particle mass
    pub particle_mass: f32,
    /// Fluid particle collision radius
    pub particle_radius: f32,
    pub interaction_radius: f32,
    pub interaction_strength: f32,
    /// Number of boundary particles lining the domain perimeter
    pub solid_count: usize,
    pub solid_radius: f32,
    /// Velocity multiplier applied once per step with dt > 0. 1.0 disables it.
    pub velocity_damping: f32,
    pub obstacles: Vec<Obstacle>,
    /// Seed for the coincident-particle tie-break. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: 400,
            spacing: 0.3,
            gravity: 0.0,
            target_density: 2.75,
            smoothing_radius: 0.5,
            pressure_multiplier: 0.5,
            viscosity_strength: 0.2,
            bounds: Vec2::new(8.0, 6.0),
            collision_damping: 0.2,
            particle_mass: 1.0,
            particle_radius: 0.1,
            interaction_radius: 3.0,
            interaction_strength: 0.0,
            solid_count: 94,
            solid_radius: 0.15,
            velocity_damping: 1.0,
            obstacles: Vec::new(),
            seed: None,
        }
    }
}

fn require(ok: bool, msg: impl Into<String>) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidConfig(msg.into()))
    }
}

impl SimulationConfig {
    /// Reject any configuration the solver cannot run.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("spacing", self.spacing),
            ("gravity", self.gravity),
            ("target_density", self.target_density),
            ("smoothing_radius", self.smoothing_radius),
            ("pressure_multiplier", self.pressure_multiplier),
            ("viscosity_strength", self.viscosity_strength),
            ("collision_damping", self.collision_damping),
            ("particle_mass", self.particle_mass),
            ("particle_radius", self.particle_radius),
            ("interaction_radius", self.interaction_radius),
            ("interaction_strength", self.interaction_strength),
            ("solid_radius", self.solid_radius),
            ("velocity_damping", self.velocity_damping),
        ];
        for (name, value) in scalars {
            require(value.is_finite(), format!("{name} must be finite, got {value}"))?;
        }

        require(self.particle_count > 0, "particle_count must be > 0")?;
        require(self.spacing > 0.0, "spacing must be > 0")?;
        require(self.smoothing_radius > 0.0, "smoothing_radius must be > 0")?;
        require(self.particle_mass > 0.0, "particle_mass must be > 0")?;
        require(self.particle_radius >= 0.0, "particle_radius must be >= 0")?;
        require(
            self.bounds.is_finite() && self.bounds.cmpgt(Vec2::ZERO).all(),
            format!("bounds must be positive, got {}", self.bounds),
        )?;
        require(
            self.bounds.min_element() > 2.0 * self.particle_radius,
            "bounds must be wider than one particle diameter",
        )?;
        require(
            (0.0..=1.0).contains(&self.collision_damping),
            "collision_damping must lie in [0, 1]",
        )?;
        require(
            self.velocity_damping > 0.0 && self.velocity_damping <= 1.0,
            "velocity_damping must lie in (0, 1]",
        )?;
        require(self.viscosity_strength >= 0.0, "viscosity_strength must be >= 0")?;
        require(self.interaction_radius >= 0.0, "interaction_radius must be >= 0")?;

        if self.solid_count > 0 {
            require(self.solid_radius > 0.0, "solid_radius must be > 0 when solids exist")?;
            require(
                self.target_density > 0.0,
                "target_density must be > 0 when solids exist",
            )?;
        }

        for (i, obstacle) in self.obstacles.iter().enumerate() {
            require(
                obstacle.center.is_finite()
                    && obstacle.half_extents.is_finite()
                    && obstacle.half_extents.cmpgt(Vec2::ZERO).all(),
                format!("obstacle {i} needs a finite center and positive half extents"),
            )?;
        }
        Ok(())
    }
}

/// Fluid particle state laid out for GPU upload (32 bytes).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct ParticleSnapshot {
    /// Position (x, y) in world coordinates
    pub pos: [f32; 2],
    /// Velocity (vx, vy)
    pub vel: [f32; 2],
    /// Density from the last step
    pub density: f32,
    /// Padding for 16-byte alignment
    pub _padding: [f32; 3],
}

impl ParticleSnapshot {
    pub fn new(position: Vec2, velocity: Vec2, density: f32) -> Self {
        Self {
            pos: position.to_array(),
            vel: velocity.to_array(),
            density,
            _padding: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacle_overlap_excludes_touching_discs() {
        let obstacle = Obstacle::new(Vec2::ZERO, Vec2::new(1.0, 0.5));
        assert!(obstacle.overlaps(Vec2::new(0.5, 0.0), 0.1));
        assert!(obstacle.overlaps(Vec2::new(1.05, 0.0), 0.1));
        assert!(!obstacle.overlaps(Vec2::new(1.2, 0.0), 0.1));
        assert!(!obstacle.overlaps(Vec2::new(0.0, 0.7), 0.1));
    }

    #[test]
    fn default_config_is_valid() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn snapshot_size_is_gpu_friendly() {
        assert_eq!(std::mem::size_of::<ParticleSnapshot>(), 32);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let cases = [
            SimulationConfig {
                particle_count: 0,
                ..Default::default()
            },
            SimulationConfig {
                smoothing_radius: 0.0,
                ..Default::default()
            },
            SimulationConfig {
                smoothing_radius: f32::NAN,
                ..Default::default()
            },
            SimulationConfig {
                bounds: Vec2::new(8.0, -1.0),
                ..Default::default()
            },
            SimulationConfig {
                collision_damping: 1.5,
                ..Default::default()
            },
            SimulationConfig {
                target_density: 0.0,
                ..Default::default()
            },
            SimulationConfig {
                obstacles: vec![Obstacle::new(Vec2::ZERO, Vec2::new(0.0, 1.0))],
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "accepted {config:?}"
            );
        }
    }

    #[test]
    fn zero_target_density_is_fine_without_solids() {
        let config = SimulationConfig {
            target_density: 0.0,
            solid_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
