//! CPU evaluation of the effect over a whole frame.

use glam::{Vec2, Vec3};
use image::{Rgba, RgbaImage};

use crate::lens::{shade, FrameInputs, LensParams};
use crate::sampler::Sampler2d;

/// Surface coordinate of the centre of pixel `(x, y)`, with row 0 at the top.
pub fn pixel_uv(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / width as f32,
        1.0 - (y as f32 + 0.5) / height as f32,
    )
}

/// Renders a `width × height` frame, one [`shade`] call per pixel.
pub fn render_image<S>(
    params: &LensParams,
    inputs: &FrameInputs,
    texture: &S,
    width: u32,
    height: u32,
) -> RgbaImage
where
    S: Sampler2d + ?Sized,
{
    let started = std::time::Instant::now();
    let image = RgbaImage::from_fn(width, height, |x, y| {
        let uv0 = pixel_uv(x, y, width, height);
        encode(shade(params, inputs, texture, uv0))
    });
    tracing::debug!(
        width,
        height,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rendered frame on CPU"
    );
    image
}

fn encode(color: Vec3) -> Rgba<u8> {
    let scaled = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    Rgba([scaled.x as u8, scaled.y as u8, scaled.z as u8, 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_centres_are_y_up() {
        assert_eq!(pixel_uv(0, 0, 2, 2), Vec2::new(0.25, 0.75));
        assert_eq!(pixel_uv(1, 1, 2, 2), Vec2::new(0.75, 0.25));
    }

    #[test]
    fn frame_has_requested_size_and_is_opaque() {
        let params = LensParams::default();
        let inputs = FrameInputs::new((64, 36), Vec2::new(16.0, 9.0), Vec2::splat(0.5));
        let texture = |uv: Vec2| Vec3::new(uv.x, uv.y, 1.0);
        let image = render_image(&params, &inputs, &texture, 64, 36);
        assert_eq!(image.dimensions(), (64, 36));
        assert!(image.pixels().all(|pixel| pixel[3] == 255));
    }

    #[test]
    fn corners_far_from_the_bubble_keep_the_source_colour() {
        let params = LensParams::default();
        let inputs = FrameInputs::new((64, 36), Vec2::new(16.0, 9.0), Vec2::splat(0.5));
        let solid = |_: Vec2| Vec3::new(0.2, 0.4, 0.6);
        let image = render_image(&params, &inputs, &solid, 64, 36);
        for (x, y) in [(0, 0), (63, 0), (0, 35), (63, 35)] {
            assert_eq!(image.get_pixel(x, y), &Rgba([51, 102, 153, 255]));
        }
    }

    #[test]
    fn ring_outside_the_bubble_is_darker_than_inside() {
        let params = LensParams::default();
        let width = 200;
        let height = 100;
        let inputs = FrameInputs::new((width, height), Vec2::new(2.0, 1.0), Vec2::splat(0.5));
        let solid = |_: Vec2| Vec3::splat(0.8);
        let image = render_image(&params, &inputs, &solid, width, height);

        let inside = image.get_pixel(width / 2, height / 2)[0];
        // uv0.x ≈ 0.85, well inside the shadow ring but clear of the rim.
        let ring = image.get_pixel(170, height / 2)[0];
        assert_eq!(inside, 204);
        assert!(ring < inside);
        assert!(ring >= 102);
    }

    #[test]
    fn encode_clamps_and_rounds() {
        assert_eq!(encode(Vec3::new(-1.0, 0.5, 2.0)), Rgba([0, 128, 255, 255]));
    }
}
