use std::path::Path;

use anyhow::{bail, Context, Result};
use refraction::{render_image, FrameInputs, ImageTexture};
use renderer::Renderer;
use tracing_subscriber::EnvFilter;

use crate::cli::{ExportArgs, RunArgs};
use crate::config::{ConfigFile, Settings};
use crate::paths::resolve_config_file;

/// Largest edge accepted for CPU-rendered stills.
pub const MAX_EXPORT_DIMENSION: u32 = 16_384;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults layered with the configuration file, before any CLI overrides.
pub fn load_settings(explicit_config: Option<&Path>) -> Result<Settings> {
    let path = resolve_config_file(explicit_config)?;
    let file = ConfigFile::load(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    Settings::from_file(file)
        .with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Opens the interactive window.
pub fn run(explicit_config: Option<&Path>, args: RunArgs) -> Result<()> {
    let mut settings = load_settings(explicit_config)?;
    settings.apply_run(&args);
    settings.validate()?;

    let config = settings.renderer_config()?;
    tracing::info!(
        image = %config.image_path.display(),
        size = ?config.surface_size,
        aspect = ?config.aspect,
        "bootstrapping lensdemo window"
    );
    Renderer::new(config).run()
}

/// Renders one frame on the CPU and writes it to `args.output`.
pub fn export(explicit_config: Option<&Path>, args: ExportArgs) -> Result<()> {
    let mut settings = load_settings(explicit_config)?;
    if let Some(image) = &args.image {
        settings.image = Some(image.clone());
    }
    settings.apply_shared(&args.shared);
    settings.validate()?;

    check_export_size(settings.size)?;
    let image_path = settings.require_image()?;
    let texture = ImageTexture::open(image_path)
        .with_context(|| format!("failed to load source image {}", image_path.display()))?;

    let (width, height) = settings.size;
    let image_resolution = settings.aspect.resolve(texture.dimensions());
    let inputs = FrameInputs::new(settings.size, image_resolution, args.pointer);
    let frame = render_image(&settings.lens, &inputs, &texture, width, height);

    if let Some(parent) = args.output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("failed to prepare export directory {}", parent.display())
        })?;
    }
    frame
        .save_with_format(&args.output, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!(
        path = %args.output.display(),
        width,
        height,
        pointer = ?args.pointer,
        "exported still frame"
    );
    Ok(())
}

fn check_export_size((width, height): (u32, u32)) -> Result<()> {
    if width > MAX_EXPORT_DIMENSION || height > MAX_EXPORT_DIMENSION {
        bail!(
            "export size {width}x{height} exceeds the {MAX_EXPORT_DIMENSION}px limit per edge"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_size_is_bounded() {
        assert!(check_export_size((1920, 1080)).is_ok());
        assert!(check_export_size((MAX_EXPORT_DIMENSION, MAX_EXPORT_DIMENSION)).is_ok());
        let err = check_export_size((100_000, 100_000)).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{err}");
        assert!(check_export_size((10, MAX_EXPORT_DIMENSION + 1)).is_err());
    }
}
