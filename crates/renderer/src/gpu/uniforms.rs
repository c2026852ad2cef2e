use bytemuck::{Pod, Zeroable};
use refraction::{LensParams, Vec2};

/// CPU mirror of the `LensUniforms` block declared by the fragment shader.
///
/// ```text
///   offset  0  vec2 resolution
///   offset  8  vec2 imageResolution
///   offset 16  vec2 u_mouse
///   offset 24  vec2 _padding0
///   offset 32  vec4 lens     (radius, edge_width, shadow_band, shadow_floor)
///   offset 48  vec4 shaping  (noise_frequency, noise_amplitude,
///                             refraction_start, refraction_power)
/// ```
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LensUniforms {
    pub resolution: [f32; 2],
    pub image_resolution: [f32; 2],
    pub mouse: [f32; 2],
    _padding0: [f32; 2],
    pub lens: [f32; 4],
    pub shaping: [f32; 4],
}

// SAFETY: every field is plain `f32` data and the layout has no implicit padding.
unsafe impl Zeroable for LensUniforms {}
unsafe impl Pod for LensUniforms {}

impl LensUniforms {
    pub fn new(resolution: (u32, u32), image_resolution: Vec2, params: &LensParams) -> Self {
        let mut uniforms = Self {
            resolution: [0.0; 2],
            image_resolution: image_resolution.to_array(),
            mouse: [0.0; 2],
            _padding0: [0.0; 2],
            lens: [
                params.radius,
                params.edge_width,
                params.shadow_band,
                params.shadow_floor,
            ],
            shaping: [
                params.noise_frequency,
                params.noise_amplitude,
                params.refraction_start,
                params.refraction_power,
            ],
        };
        uniforms.set_resolution(resolution.0, resolution.1);
        uniforms
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = [width.max(1) as f32, height.max(1) as f32];
    }

    /// Applies a surface resize. The resolution keeps its start-up value
    /// unless `resync` is set. Returns whether it changed.
    pub fn on_resize(&mut self, width: u32, height: u32, resync: bool) -> bool {
        if !resync {
            return false;
        }
        let previous = self.resolution;
        self.set_resolution(width, height);
        previous != self.resolution
    }

    pub fn set_mouse(&mut self, pointer: Vec2) {
        self.mouse = pointer.to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    #[test]
    fn lens_uniforms_follow_std140_layout() {
        let uniforms = LensUniforms::new((1920, 1080), Vec2::new(16.0, 9.0), &LensParams::default());
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<LensUniforms>(), 16);
        assert_eq!(size_of::<LensUniforms>(), 64);
        assert_eq!((&uniforms.resolution as *const _ as usize) - base, 0);
        assert_eq!((&uniforms.image_resolution as *const _ as usize) - base, 8);
        assert_eq!((&uniforms.mouse as *const _ as usize) - base, 16);
        assert_eq!((&uniforms._padding0 as *const _ as usize) - base, 24);
        assert_eq!((&uniforms.lens as *const _ as usize) - base, 32);
        assert_eq!((&uniforms.shaping as *const _ as usize) - base, 48);
    }

    #[test]
    fn packs_lens_parameters() {
        let params = LensParams::default();
        let uniforms = LensUniforms::new((800, 600), Vec2::new(16.0, 9.0), &params);
        assert_eq!(uniforms.resolution, [800.0, 600.0]);
        assert_eq!(uniforms.image_resolution, [16.0, 9.0]);
        assert_eq!(uniforms.lens, [0.3, 0.003, 0.1, 0.5]);
        assert_eq!(uniforms.shaping, [3.0, 0.02, 0.1, 3.0]);
    }

    #[test]
    fn mouse_and_resolution_updates() {
        let mut uniforms =
            LensUniforms::new((800, 600), Vec2::new(16.0, 9.0), &LensParams::default());
        uniforms.set_mouse(Vec2::new(0.25, 0.75));
        uniforms.set_resolution(0, 300);
        assert_eq!(uniforms.mouse, [0.25, 0.75]);
        assert_eq!(uniforms.resolution, [1.0, 300.0]);
        assert_eq!(bytemuck::bytes_of(&uniforms).len(), 64);
    }

    #[test]
    fn resize_keeps_startup_resolution_without_resync() {
        let mut uniforms =
            LensUniforms::new((800, 600), Vec2::new(16.0, 9.0), &LensParams::default());
        assert!(!uniforms.on_resize(1280, 720, false));
        assert_eq!(uniforms.resolution, [800.0, 600.0]);
    }

    #[test]
    fn resize_with_resync_tracks_surface() {
        let mut uniforms =
            LensUniforms::new((800, 600), Vec2::new(16.0, 9.0), &LensParams::default());
        assert!(uniforms.on_resize(1280, 720, true));
        assert_eq!(uniforms.resolution, [1280.0, 720.0]);
        assert!(!uniforms.on_resize(1280, 720, true));
    }
}
