//! The lens bubble: mask, refraction, shadow and final composite.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize, Serializer};

use crate::cover::{cover_ratio, cover_uv};
use crate::error::Error;
use crate::math::{map_range, mix3, smoothstep};
use crate::noise::cnoise;
use crate::sampler::Sampler2d;

/// Tunable constants of the effect.
///
/// The defaults reproduce the reference look: a bubble of radius `0.3`
/// with a `0.003` antialiased rim, a shadow ring `0.1` wide that darkens the
/// background to half brightness, cubic refraction starting at `0.1` and
/// edge noise of amplitude `0.02` sampled at frequency `3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LensParams {
    #[serde(serialize_with = "serialize_shortest")]
    pub radius: f32,
    #[serde(serialize_with = "serialize_shortest")]
    pub edge_width: f32,
    #[serde(serialize_with = "serialize_shortest")]
    pub shadow_band: f32,
    #[serde(serialize_with = "serialize_shortest")]
    pub shadow_floor: f32,
    #[serde(serialize_with = "serialize_shortest")]
    pub refraction_start: f32,
    #[serde(serialize_with = "serialize_shortest")]
    pub refraction_power: f32,
    #[serde(serialize_with = "serialize_shortest")]
    pub noise_frequency: f32,
    #[serde(serialize_with = "serialize_shortest")]
    pub noise_amplitude: f32,
}

/// The `f64` whose shortest decimal form matches `value`'s, so `0.3_f32`
/// becomes `0.3` rather than `0.30000001192092896`.
fn shortest_f64(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

pub(crate) fn serialize_shortest<S: Serializer>(
    value: &f32,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(shortest_f64(*value))
}

impl Default for LensParams {
    fn default() -> Self {
        Self {
            radius: 0.3,
            edge_width: 0.003,
            shadow_band: 0.1,
            shadow_floor: 0.5,
            refraction_start: 0.1,
            refraction_power: 3.0,
            noise_frequency: 3.0,
            noise_amplitude: 0.02,
        }
    }
}

/// Uniform state shared by every pixel of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    /// Viewport size in pixels.
    pub resolution: Vec2,
    /// Image size used for the cover fit.
    pub image_resolution: Vec2,
    /// Pointer in normalised coordinates, origin bottom-left.
    pub pointer: Vec2,
}

impl FrameInputs {
    pub fn new(resolution: (u32, u32), image_resolution: Vec2, pointer: Vec2) -> Self {
        Self {
            resolution: Vec2::new(resolution.0.max(1) as f32, resolution.1.max(1) as f32),
            image_resolution,
            pointer,
        }
    }

    pub fn cover_ratio(&self) -> Vec2 {
        cover_ratio(self.resolution, self.image_resolution)
    }
}

/// Every intermediate value computed for a single pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensTerms {
    /// Cover-fitted texture coordinate.
    pub uv: Vec2,
    /// Noise offset added to the distance.
    pub noise: f32,
    /// Perturbed distance from the pointer.
    pub dist: f32,
    /// 1 inside the bubble, 0 outside.
    pub limit: f32,
    /// Refraction strength after easing.
    pub range: f32,
    /// Displacement subtracted from `uv` for the bubble sample.
    pub refract: Vec2,
    /// Background brightness in `[shadow_floor, 1]`.
    pub shadow: f32,
}

impl LensParams {
    /// Rejects parameter sets that would divide by zero or invert a range.
    pub fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("radius", self.radius),
            ("edge_width", self.edge_width),
            ("shadow_band", self.shadow_band),
            ("shadow_floor", self.shadow_floor),
            ("refraction_start", self.refraction_start),
            ("refraction_power", self.refraction_power),
            ("noise_frequency", self.noise_frequency),
            ("noise_amplitude", self.noise_amplitude),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(Error::InvalidParams(format!("{name} must be finite (got {value})")));
        }
        if self.radius <= 0.0 {
            return Err(Error::InvalidParams("radius must be positive".into()));
        }
        if self.edge_width <= 0.0 || self.edge_width > self.radius {
            return Err(Error::InvalidParams(
                "edge_width must be positive and no larger than radius".into(),
            ));
        }
        if self.shadow_band <= 0.0 {
            return Err(Error::InvalidParams("shadow_band must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.shadow_floor) {
            return Err(Error::InvalidParams("shadow_floor must lie in [0, 1]".into()));
        }
        if self.refraction_start < 0.0 || self.refraction_start >= self.radius {
            return Err(Error::InvalidParams(
                "refraction_start must lie in [0, radius)".into(),
            ));
        }
        if self.refraction_power <= 0.0 {
            return Err(Error::InvalidParams("refraction_power must be positive".into()));
        }
        if self.noise_frequency < 0.0 || self.noise_amplitude < 0.0 {
            return Err(Error::InvalidParams(
                "noise_frequency and noise_amplitude must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Edge-perturbing noise at cover-fitted coordinate `uv`.
    pub fn noise_offset(&self, uv: Vec2) -> f32 {
        if self.noise_amplitude == 0.0 {
            return 0.0;
        }
        cnoise(uv * self.noise_frequency) * self.noise_amplitude
    }

    /// Bubble selector: 1 inside, 0 outside, antialiased over `edge_width`.
    pub fn mask(&self, dist: f32) -> f32 {
        1.0 - smoothstep(self.radius - self.edge_width, self.radius, dist)
    }

    /// Eased refraction strength: 0 below `refraction_start`, 1 at `radius`.
    pub fn refraction_amount(&self, dist: f32) -> f32 {
        map_range(dist, self.refraction_start, self.radius, 0.0, 1.0).powf(self.refraction_power)
    }

    /// Background brightness around the bubble.
    pub fn shadow(&self, dist: f32) -> f32 {
        let ramp = smoothstep(self.radius, self.radius + self.shadow_band, dist);
        ramp * (1.0 - self.shadow_floor) + self.shadow_floor
    }

    /// Computes every per-pixel term for surface coordinate `uv0`.
    pub fn evaluate(&self, inputs: &FrameInputs, uv0: Vec2) -> LensTerms {
        let uv = cover_uv(uv0, inputs.cover_ratio());
        let noise = self.noise_offset(uv);
        let dist = uv0.distance(inputs.pointer) + noise;
        let limit = self.mask(dist);
        let range = self.refraction_amount(dist);
        let refract = (uv - inputs.pointer) * range;
        let shadow = self.shadow(dist);

        LensTerms {
            uv,
            noise,
            dist,
            limit,
            range,
            refract,
            shadow,
        }
    }
}

/// Shades one pixel: refracted sample inside the bubble, shadowed image outside.
pub fn shade<S>(params: &LensParams, inputs: &FrameInputs, texture: &S, uv0: Vec2) -> Vec3
where
    S: Sampler2d + ?Sized,
{
    let terms = params.evaluate(inputs, uv0);
    let in_circle = texture.sample(terms.uv - terms.refract);
    let base = texture.sample(terms.uv);
    let background = mix3(Vec3::ZERO, base, terms.shadow);
    mix3(background, in_circle, terms.limit)
}
