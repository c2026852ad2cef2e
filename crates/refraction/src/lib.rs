//! Shading core for the lens bubble effect.
//!
//! Every pixel of the frame is produced by [`shade`], a pure function of the
//! surface coordinate, the pointer position and the viewport/image aspect
//! ratios. The GPU fragment stage in the `renderer` crate mirrors this code
//! line for line; the CPU path in [`raster`] evaluates it directly so still
//! frames can be exported (and tested) without a GPU.
//!
//! ```text
//!   uv0 ──▶ cover_uv ──▶ uv ──▶ cnoise ──▶ n
//!    │                   │                 │
//!    └──── distance(uv0, pointer) + n ─────┴─▶ dist
//!                                              │
//!          mask / refraction_amount / shadow ◀─┘
//!                        │
//!   texture(uv - refract), texture(uv) ──▶ composite ──▶ RGB
//! ```

pub mod cover;
pub mod error;
pub mod lens;
pub mod math;
pub mod noise;
pub mod pointer;
pub mod raster;
pub mod sampler;

pub use cover::{cover_ratio, cover_uv, AspectSource, DEFAULT_IMAGE_RESOLUTION};
pub use error::Error;
pub use lens::{shade, FrameInputs, LensParams, LensTerms};
pub use noise::cnoise;
pub use pointer::PointerState;
pub use raster::render_image;
pub use sampler::{ImageTexture, Sampler2d};

pub use glam::{Vec2, Vec3};
