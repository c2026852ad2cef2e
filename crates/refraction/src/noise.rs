//! Classic 2D gradient (Perlin) noise.
//!
//! Hash and gradient construction use the permutation polynomial
//! `((x * 34) + 1) * x mod 289`, so there is no lookup table and the result is
//! bit-for-bit reproducible on every call. The fragment stage carries the
//! same algorithm in vectorised GLSL.

use glam::Vec2;

use crate::math::{fract, mix};

/// `1 / 41`, spreads permutation values over the gradient ring.
pub const GRADIENT_SPREAD: f32 = 0.024_390_243;
/// Taylor approximation of `1 / sqrt(r)` around `r = 0.7`.
pub const TAYLOR_INV_SQRT_A: f32 = 1.792_842_9;
pub const TAYLOR_INV_SQRT_B: f32 = 0.853_734_7;
/// Rescales the interpolated result to roughly `[-1, 1]`.
pub const OUTPUT_SCALE: f32 = 2.3;

/// GLSL `mod(x, 289.0)`.
#[inline]
pub fn mod289(x: f32) -> f32 {
    x - 289.0 * (x / 289.0).floor()
}

/// Permutation polynomial over the integers mod 289.
#[inline]
pub fn permute(x: f32) -> f32 {
    mod289(((x * 34.0) + 1.0) * x)
}

/// Quintic fade curve `t³(t(6t − 15) + 10)`; C² continuous at 0 and 1.
#[inline]
pub fn fade(t: Vec2) -> Vec2 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Evaluates 2D gradient noise at `p`.
///
/// The result is zero on every integer lattice point and varies smoothly in
/// between. Lattice coordinates are wrapped mod 289, so the pattern repeats
/// every 289 units on both axes.
pub fn cnoise(p: Vec2) -> f32 {
    let cell = p.floor();
    let local = p - cell;

    let corner = |dx: f32, dy: f32| {
        let ix = mod289(cell.x + dx);
        let iy = mod289(cell.y + dy);
        let hash = permute(permute(ix) + iy);
        gradient(hash).dot(local - Vec2::new(dx, dy))
    };

    let n00 = corner(0.0, 0.0);
    let n10 = corner(1.0, 0.0);
    let n01 = corner(0.0, 1.0);
    let n11 = corner(1.0, 1.0);

    let weights = fade(local);
    let bottom = mix(n00, n10, weights.x);
    let top = mix(n01, n11, weights.x);
    OUTPUT_SCALE * mix(bottom, top, weights.y)
}

/// Maps a permutation value onto a (near) unit gradient on a diamond.
fn gradient(hash: f32) -> Vec2 {
    let mut gx = 2.0 * fract(hash * GRADIENT_SPREAD) - 1.0;
    let gy = gx.abs() - 0.5;
    gx -= (gx + 0.5).floor();
    let g = Vec2::new(gx, gy);
    g * (TAYLOR_INV_SQRT_A - TAYLOR_INV_SQRT_B * g.length_squared())
}
