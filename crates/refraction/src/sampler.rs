use std::path::Path;

use glam::{Vec2, Vec3};
use image::imageops::flip_vertical;
use image::RgbaImage;

use crate::error::Error;

/// Read-only 2D texture addressed in `[0, 1]²` with `v = 0` at the bottom.
pub trait Sampler2d {
    fn sample(&self, uv: Vec2) -> Vec3;
}

impl<F> Sampler2d for F
where
    F: Fn(Vec2) -> Vec3,
{
    fn sample(&self, uv: Vec2) -> Vec3 {
        self(uv)
    }
}

/// Decoded RGBA image sampled with bilinear filtering and clamp-to-edge
/// addressing, matching the GPU sampler state.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    image: RgbaImage,
}

impl ImageTexture {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let image = image::open(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let texture = Self::from_rgba(image.to_rgba8())?;
        tracing::info!(
            path = %path.display(),
            width = texture.image.width(),
            height = texture.image.height(),
            "loaded source image"
        );
        Ok(texture)
    }

    pub fn from_rgba(image: RgbaImage) -> Result<Self, Error> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        Ok(Self { image })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Rows reordered bottom-up, the layout GPU upload expects for `v = 0`
    /// to address the bottom of the picture.
    pub fn bottom_up_rgba(&self) -> RgbaImage {
        flip_vertical(&self.image)
    }

    fn texel(&self, x: i64, y: i64) -> Vec3 {
        let max_x = i64::from(self.image.width()) - 1;
        let max_y = i64::from(self.image.height()) - 1;
        let pixel = self
            .image
            .get_pixel(x.clamp(0, max_x) as u32, y.clamp(0, max_y) as u32);
        Vec3::new(
            f32::from(pixel[0]),
            f32::from(pixel[1]),
            f32::from(pixel[2]),
        ) / 255.0
    }
}

impl Sampler2d for ImageTexture {
    fn sample(&self, uv: Vec2) -> Vec3 {
        let (width, height) = self.dimensions();
        // Texel centres sit at half-integers; image rows run top-down.
        let x = uv.x * width as f32 - 0.5;
        let y = (1.0 - uv.y) * height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let (ix, iy) = (x0 as i64, y0 as i64);

        let top = self.texel(ix, iy).lerp(self.texel(ix + 1, iy), tx);
        let bottom = self.texel(ix, iy + 1).lerp(self.texel(ix + 1, iy + 1), tx);
        top.lerp(bottom, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn two_by_two() -> ImageTexture {
        // Top row red/green, bottom row blue/white.
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        image.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        ImageTexture::from_rgba(image).unwrap()
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn texel_centres_return_exact_colours() {
        let texture = two_by_two();
        assert!(close(texture.sample(Vec2::new(0.25, 0.75)), Vec3::X));
        assert!(close(texture.sample(Vec2::new(0.75, 0.75)), Vec3::Y));
        assert!(close(texture.sample(Vec2::new(0.25, 0.25)), Vec3::Z));
        assert!(close(texture.sample(Vec2::new(0.75, 0.25)), Vec3::ONE));
    }

    #[test]
    fn centre_blends_all_four_texels() {
        let texture = two_by_two();
        let expected = (Vec3::X + Vec3::Y + Vec3::Z + Vec3::ONE) / 4.0;
        assert!(close(texture.sample(Vec2::splat(0.5)), expected));
    }

    #[test]
    fn out_of_range_coordinates_clamp_to_edge() {
        let texture = two_by_two();
        assert!(close(texture.sample(Vec2::new(-3.0, 5.0)), Vec3::X));
        assert!(close(texture.sample(Vec2::new(4.0, -2.0)), Vec3::ONE));
    }

    #[test]
    fn bottom_up_copy_flips_rows() {
        let texture = two_by_two();
        let flipped = texture.bottom_up_rgba();
        assert_eq!(flipped.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(flipped.get_pixel(1, 1), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn empty_images_are_rejected() {
        let err = ImageTexture::from_rgba(RgbaImage::new(0, 4)).unwrap_err();
        assert!(matches!(err, Error::EmptyImage { width: 0, height: 4 }));
    }

    #[test]
    fn closures_act_as_samplers() {
        let solid = |_: Vec2| Vec3::splat(0.5);
        assert_eq!(solid.sample(Vec2::ZERO), Vec3::splat(0.5));
    }
}
