//! CPU reference of the halftone fragment stage.
//!
//! Mirrors `halftone_fragment.wgsl` operation for operation so the band model
//! can be checked without a GPU.

use glam::{Vec2, Vec3};

use super::HalftoneUniforms;

pub const SHADOW_DIRECTION: Vec3 = Vec3::new(0.0, -1.0, 0.0);
pub const HIGHLIGHT_DIRECTION: Vec3 =
    Vec3::new(std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2, 0.0);

/// Hermite ramp of `signal` across `(low, high)`.
///
/// `low > high` inverts the ramp. `low == high` is a hard step at `low`.
pub fn coverage(signal: f32, low: f32, high: f32) -> f32 {
    let span = high - low;
    if span.abs() < 1e-6 {
        return if signal >= low { 1.0 } else { 0.0 };
    }
    let t = ((signal - low) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Whether fragment `frag` lies inside a dot of the given coverage.
pub fn inside_dot(frag: Vec2, resolution_y: f32, repetition: f32, intensity: f32) -> bool {
    let uv = (frag / resolution_y.max(1.0) * repetition).fract();
    uv.distance(Vec2::splat(0.5)) < 0.5 * intensity
}

/// Final linear RGB of a fragment at surface pixel `frag` with surface normal `normal`.
pub fn shade(u: &HalftoneUniforms, normal: Vec3, frag: Vec2) -> Vec3 {
    let normal = normal.normalize_or_zero();
    let rgb = |c: [f32; 4]| Vec3::new(c[0], c[1], c[2]);
    let res_y = u.resolution[1];

    let mut color = rgb(u.base_color);

    let shadow = coverage(normal.dot(SHADOW_DIRECTION), u.shadow_low, u.shadow_high);
    if inside_dot(frag, res_y, u.repetition, shadow) {
        color = rgb(u.shadow_color);
    }

    let highlight = coverage(normal.dot(HIGHLIGHT_DIRECTION), u.highlight_low, u.highlight_high);
    if inside_dot(frag, res_y, u.repetition, highlight) {
        color = rgb(u.highlight_color);
    }

    color
}
