//! Smoothing kernels shared by every SPH stage.
//!
//! All kernels have compact support: they evaluate to exactly `0.0` for
//! `dist >= radius`. Density, pressure and viscosity all call into this
//! module, so there is a single definition of each kernel shape.

use std::f32::consts::PI;

/// Normalisation volume `π·r⁴/6` of the 2D spiky kernel.
#[inline]
fn spiky_volume(radius: f32) -> f32 {
    PI * radius.powi(4) / 6.0
}

/// Density kernel `(r - d)² / V`.
///
/// Maximal at `dist == 0`, monotonically decreasing towards the radius.
#[inline]
pub fn density_kernel(dist: f32, radius: f32) -> f32 {
    if dist >= radius {
        return 0.0;
    }
    let value = radius - dist;
    value * value / spiky_volume(radius)
}

/// Slope magnitude of the density kernel, `(r - d)·12/(π·r⁴)`.
///
/// Always non-negative; callers apply the sign through a direction vector.
#[inline]
pub fn density_kernel_derivative(dist: f32, radius: f32) -> f32 {
    if dist >= radius {
        return 0.0;
    }
    let scale = 12.0 / (PI * radius.powi(4));
    (radius - dist) * scale
}

/// Viscosity kernel `(r² - d²)² / V`, used only to weight velocity diffusion.
#[inline]
pub fn viscosity_kernel(dist: f32, radius: f32) -> f32 {
    if dist >= radius {
        return 0.0;
    }
    let value = radius * radius - dist * dist;
    value * value / spiky_volume(radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f32 = 0.5;

    #[test]
    fn kernels_vanish_outside_support() {
        for dist in [RADIUS, RADIUS + 1e-4, 1.0, 10.0] {
            assert_eq!(density_kernel(dist, RADIUS), 0.0);
            assert_eq!(density_kernel_derivative(dist, RADIUS), 0.0);
            assert_eq!(viscosity_kernel(dist, RADIUS), 0.0);
        }
    }

    #[test]
    fn density_kernel_peaks_at_zero_and_decreases() {
        let peak = density_kernel(0.0, RADIUS);
        let expected = RADIUS * RADIUS / (PI * RADIUS.powi(4) / 6.0);
        assert!((peak - expected).abs() < 1e-4);

        let mut prev = peak;
        for step in 1..=50 {
            let dist = RADIUS * step as f32 / 50.0;
            let value = density_kernel(dist, RADIUS);
            assert!(value <= prev, "kernel increased at d={dist}");
            prev = value;
        }
    }

    #[test]
    fn derivative_is_non_negative_inside_support() {
        for step in 0..50 {
            let dist = RADIUS * step as f32 / 50.0;
            assert!(density_kernel_derivative(dist, RADIUS) > 0.0);
        }
    }

    #[test]
    fn viscosity_kernel_matches_closed_form() {
        let dist = 0.2;
        let value = (RADIUS * RADIUS - dist * dist).powi(2) / (PI * RADIUS.powi(4) / 6.0);
        assert!((viscosity_kernel(dist, RADIUS) - value).abs() < 1e-5);
    }
}
