//! Interactive GPU host for the lens bubble effect.
//!
//! ```text
//!   CLI / lensdemo
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          │                │                                  │
//!          │                └─ PointerState ◀─ CursorMoved     └─▶ LensUniforms ─▶ GPU UBO
//!          └─▶ ImageTexture (decoded once, uploaded bottom-up)
//! ```
//!
//! `WindowState` owns the GPU resources and the pointer context. The fragment
//! shader evaluates the same per-pixel function as `refraction::shade`.

mod compile;
mod gpu;
mod types;
mod window;

use anyhow::{Context, Result};
use refraction::ImageTexture;

pub use gpu::LensUniforms;
pub use types::{Antialiasing, ColorSpaceMode, RendererConfig};

/// Entry point that owns the configuration and opens the window.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Loads the source image, then blocks in the event loop until the window
    /// closes. Image and parameter problems are reported before any window
    /// is created.
    pub fn run(&mut self) -> Result<()> {
        self.config
            .lens
            .validate()
            .context("invalid lens parameters")?;
        let image = ImageTexture::open(&self.config.image_path).with_context(|| {
            format!(
                "failed to load source image {}",
                self.config.image_path.display()
            )
        })?;
        tracing::info!(
            image = %self.config.image_path.display(),
            width = self.config.surface_size.0,
            height = self.config.surface_size.1,
            antialiasing = ?self.config.antialiasing,
            color_space = %self.config.color_space,
            "starting lens window"
        );
        window::run_window(&self.config, &image)
    }
}
