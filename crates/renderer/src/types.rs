use std::path::PathBuf;

use refraction::{AspectSource, LensParams};

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    #[default]
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl std::fmt::Display for Antialiasing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Antialiasing::Auto => f.write_str("auto"),
            Antialiasing::Off => f.write_str("off"),
            Antialiasing::Samples(count) => write!(f, "{count}"),
        }
    }
}

/// Output color handling for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Same as `Gamma`: image bytes reach the screen unconverted.
    #[default]
    Auto,
    /// Treat image data and shader outputs as gamma-encoded; use non-sRGB surfaces.
    Gamma,
    /// Blend in linear space and use sRGB swapchains/textures for conversion.
    Linear,
}

impl std::fmt::Display for ColorSpaceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorSpaceMode::Auto => f.write_str("auto"),
            ColorSpaceMode::Gamma => f.write_str("gamma"),
            ColorSpaceMode::Linear => f.write_str("linear"),
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags and the config file: which image to
/// distort, how large the window should be, and how the lens is shaped.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Image drawn behind the lens.
    pub image_path: PathBuf,
    /// Window title.
    pub title: String,
    /// Shape of the bubble, shadow and edge noise.
    pub lens: LensParams,
    /// Where the image resolution for the cover fit comes from.
    pub aspect: AspectSource,
    /// Update the `resolution` uniform when the window is resized. Off by
    /// default: the uniform keeps the size captured at start-up.
    pub resync_on_resize: bool,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
    /// Desired color handling for swapchain/textures.
    pub color_space: ColorSpaceMode,
}

impl Default for RendererConfig {
    /// Provides a 1080p window with the reference lens and no image selected.
    fn default() -> Self {
        Self {
            surface_size: (1920, 1080),
            image_path: PathBuf::new(),
            title: "Lens Bubble".to_string(),
            lens: LensParams::default(),
            aspect: AspectSource::default(),
            resync_on_resize: false,
            antialiasing: Antialiasing::default(),
            color_space: ColorSpaceMode::default(),
        }
    }
}
