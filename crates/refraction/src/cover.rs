//! "background-size: cover" remapping of surface coordinates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Image resolution assumed when the real image size is not consulted.
pub const DEFAULT_IMAGE_RESOLUTION: Vec2 = Vec2::new(16.0, 9.0);

/// Per-axis scale that crops the image to fill the viewport.
///
/// The axis along which the viewport is relatively narrower than the image
/// gets a ratio below one; the other axis stays at one.
pub fn cover_ratio(resolution: Vec2, image_resolution: Vec2) -> Vec2 {
    Vec2::new(
        ((resolution.x / resolution.y) / (image_resolution.x / image_resolution.y)).min(1.0),
        ((resolution.y / resolution.x) / (image_resolution.y / image_resolution.x)).min(1.0),
    )
}

/// Scales `uv0` by `ratio` around the centre of the image.
pub fn cover_uv(uv0: Vec2, ratio: Vec2) -> Vec2 {
    uv0 * ratio + (Vec2::ONE - ratio) * 0.5
}

/// Where the image resolution fed to the cover fit comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AspectSource {
    /// A constant resolution, independent of the loaded image.
    Fixed {
        #[serde(serialize_with = "crate::lens::serialize_shortest")]
        width: f32,
        #[serde(serialize_with = "crate::lens::serialize_shortest")]
        height: f32,
    },
    /// The pixel size of the loaded image.
    Texture,
}

impl Default for AspectSource {
    fn default() -> Self {
        Self::Fixed {
            width: DEFAULT_IMAGE_RESOLUTION.x,
            height: DEFAULT_IMAGE_RESOLUTION.y,
        }
    }
}

impl AspectSource {
    /// Rejects fixed resolutions that would divide by zero in the cover fit.
    pub fn validate(&self) -> Result<(), Error> {
        match *self {
            Self::Fixed { width, height }
                if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) =>
            {
                Err(Error::InvalidParams(format!(
                    "fixed image resolution must be positive (got {width}x{height})"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Resolves the image resolution given the loaded texture size.
    pub fn resolve(&self, texture_size: (u32, u32)) -> Vec2 {
        match *self {
            Self::Fixed { width, height } => Vec2::new(width, height),
            Self::Texture => Vec2::new(texture_size.0.max(1) as f32, texture_size.1.max(1) as f32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_aspect_leaves_coordinates_untouched() {
        let ratio = cover_ratio(Vec2::new(1920.0, 1080.0), DEFAULT_IMAGE_RESOLUTION);
        assert_eq!(ratio, Vec2::ONE);
        for uv0 in [Vec2::ZERO, Vec2::new(0.25, 0.8), Vec2::ONE] {
            assert_eq!(cover_uv(uv0, ratio), uv0);
        }
    }

    #[test]
    fn square_viewport_crops_horizontally() {
        let ratio = cover_ratio(Vec2::new(1000.0, 1000.0), DEFAULT_IMAGE_RESOLUTION);
        assert!((ratio.x - 0.5625).abs() < 1e-6);
        assert_eq!(ratio.y, 1.0);

        let left = cover_uv(Vec2::new(0.0, 0.0), ratio);
        let right = cover_uv(Vec2::new(1.0, 1.0), ratio);
        assert!((left.x - 0.21875).abs() < 1e-6);
        assert!((right.x - 0.78125).abs() < 1e-6);
        assert_eq!(left.y, 0.0);
        assert_eq!(right.y, 1.0);
    }

    #[test]
    fn ultrawide_viewport_crops_vertically() {
        let ratio = cover_ratio(Vec2::new(3440.0, 1080.0), DEFAULT_IMAGE_RESOLUTION);
        assert_eq!(ratio.x, 1.0);
        assert!(ratio.y < 1.0);
        let centre = cover_uv(Vec2::splat(0.5), ratio);
        assert!((centre - Vec2::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn aspect_source_resolves_fixed_and_texture() {
        assert_eq!(AspectSource::default().resolve((4, 3)), DEFAULT_IMAGE_RESOLUTION);
        assert_eq!(AspectSource::Texture.resolve((4, 3)), Vec2::new(4.0, 3.0));
        assert_eq!(AspectSource::Texture.resolve((0, 0)), Vec2::ONE);
    }

    #[test]
    fn fixed_resolution_must_be_positive() {
        assert!(AspectSource::default().validate().is_ok());
        assert!(AspectSource::Texture.validate().is_ok());
        let flat = AspectSource::Fixed {
            width: 16.0,
            height: 0.0,
        };
        assert!(matches!(flat.validate(), Err(Error::InvalidParams(_))));
    }
}
