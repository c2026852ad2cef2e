//! GPU side of the lens renderer.
//!
//! - `context` owns wgpu instance/device/surface wiring and rebuilds the
//!   swapchain when the window resizes.
//! - `texture` uploads the source image and its clamp-to-edge sampler.
//! - `pipeline` compiles the GLSL shaders into a single render pipeline.
//! - `uniforms` mirrors the `LensUniforms` block byte for byte.
//! - `state` glues everything together behind `GpuState`.

mod context;
mod pipeline;
mod state;
mod texture;
mod uniforms;

pub(crate) use state::GpuState;
pub use uniforms::LensUniforms;
