//! Scalar helpers with GLSL semantics.
//!
//! These follow the GLSL definitions exactly (including `clamp` written as
//! `min(max(x, lo), hi)`) so the CPU path and the fragment stage agree.

use glam::Vec3;

/// GLSL `clamp`; never panics on inverted bounds or NaN.
#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    x.max(lo).min(hi)
}

/// GLSL `fract`: `x - floor(x)`, always in `[0, 1)`.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL `mix`: `a * (1 - t) + b * t`.
///
/// Written in this form so `t == 0` and `t == 1` return the endpoints exactly.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Component-wise [`mix`] for colours.
#[inline]
pub fn mix3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Cubic Hermite step between `edge0` and `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linearly rescales `value` from `[min1, max1]` into `[min2, max2]`.
///
/// The input is clamped to the source range first, so the result never
/// leaves the target range.
#[inline]
pub fn map_range(value: f32, min1: f32, max1: f32, min2: f32, max2: f32) -> f32 {
    let v = clamp(value, min1, max1);
    min2 + (v - min1) * (max2 - min2) / (max1 - min1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_hits_edges_and_midpoint() {
        assert_eq!(smoothstep(0.0, 1.0, -0.5), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn map_range_clamps_input() {
        assert_eq!(map_range(0.0, 0.1, 0.3, 0.0, 1.0), 0.0);
        assert_eq!(map_range(0.5, 0.1, 0.3, 0.0, 1.0), 1.0);
        assert!((map_range(0.2, 0.1, 0.3, 0.0, 1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mix_returns_endpoints_exactly() {
        assert_eq!(mix(0.3, 0.7, 0.0), 0.3);
        assert_eq!(mix(0.3, 0.7, 1.0), 0.7);
        let a = Vec3::new(0.1, 0.2, 0.3);
        let b = Vec3::new(0.9, 0.8, 0.7);
        assert_eq!(mix3(a, b, 1.0), b);
        assert_eq!(mix3(a, b, 0.0), a);
    }

    #[test]
    fn fract_is_floor_based() {
        assert!((fract(-0.25) - 0.75).abs() < 1e-6);
        assert_eq!(fract(3.0), 0.0);
    }

    #[test]
    fn clamp_tolerates_nan() {
        assert_eq!(clamp(f32::NAN, 0.0, 1.0), 0.0);
    }
}
