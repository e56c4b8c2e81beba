//! Initial particle placement.

use bevy::math::Vec2;

use crate::resources::SimulationConfig;

/// Fluid particles on a square-ish grid centered on the origin.
///
/// Rows hold `floor(sqrt(n))` particles; the last row may be partial.
pub fn fluid_grid(count: usize, spacing: f32) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }
    let per_row = ((count as f32).sqrt() as usize).max(1);
    let per_col = (count - 1) / per_row + 1;
    let x_offset = (per_row - 1) as f32 / 2.0;
    let y_offset = (per_col - 1) as f32 / 2.0;

    (0..count)
        .map(|i| {
            let col = (i % per_row) as f32;
            let row = (i / per_row) as f32;
            Vec2::new((col - x_offset) * spacing, (row - y_offset) * spacing)
        })
        .collect()
}

/// `count` points evenly spaced around the rectangle `bounds`, pushed
/// outward by `offset` so they line the domain from outside.
pub fn perimeter_ring(count: usize, bounds: Vec2, offset: f32) -> Vec<Vec2> {
    let half = bounds / 2.0 + Vec2::splat(offset);
    let (width, height) = (half.x * 2.0, half.y * 2.0);
    let perimeter = 2.0 * (width + height);
    let step = perimeter / count.max(1) as f32;

    (0..count)
        .map(|i| {
            // Walk clockwise from the top-left corner.
            let mut s = i as f32 * step;
            if s < width {
                return Vec2::new(-half.x + s, half.y);
            }
            s -= width;
            if s < height {
                return Vec2::new(half.x, half.y - s);
            }
            s -= height;
            if s < width {
                return Vec2::new(half.x - s, -half.y);
            }
            s -= width;
            Vec2::new(-half.x, -half.y + s.min(height))
        })
        .collect()
}

/// Initial fluid and solid positions for `config`.
pub fn layout(config: &SimulationConfig) -> (Vec<Vec2>, Vec<Vec2>) {
    (
        fluid_grid(config.particle_count, config.spacing),
        perimeter_ring(config.solid_count, config.bounds, config.solid_radius),
    )
}
