use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use refraction::{AspectSource, Vec2};
use renderer::{Antialiasing, ColorSpaceMode};

#[derive(Parser, Debug)]
#[command(
    name = "lensdemo",
    author,
    version,
    about = "Lens bubble that follows the pointer over an image",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Configuration file to load instead of the discovered `lensdemo.toml`.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Overrides shared by the window and the still exporter.
#[derive(Parser, Debug, Default)]
pub struct SharedArgs {
    /// Viewport size in pixels (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Image resolution for the cover fit: `texture` or `WIDTHxHEIGHT` (default `16x9`).
    #[arg(long, value_name = "MODE", value_parser = parse_aspect)]
    pub aspect: Option<AspectSource>,

    /// Bubble radius in normalised surface units.
    #[arg(long, value_name = "RADIUS")]
    pub radius: Option<f32>,

    /// Amplitude of the edge noise (0 gives a perfect circle).
    #[arg(long, value_name = "AMOUNT")]
    pub noise_amplitude: Option<f32>,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Image shown behind the lens.
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    #[command(flatten)]
    pub shared: SharedArgs,

    /// Window title.
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialias)]
    pub antialias: Option<Antialiasing>,

    /// Output color space handling: `auto`, `gamma`, or `linear`.
    #[arg(long, value_name = "MODE", value_parser = parse_color_space)]
    pub color_space: Option<ColorSpaceMode>,

    /// Update the resolution uniform when the window is resized.
    #[arg(long)]
    pub resync_on_resize: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a single frame on the CPU and write it as PNG.
    Export(ExportArgs),
    /// Inspect the configuration file.
    Config(ConfigCommand),
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Image shown behind the lens.
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Destination PNG path.
    #[arg(long, short, value_name = "PATH", value_parser = parse_export_path)]
    pub output: PathBuf,

    /// Pointer position in normalised coordinates, origin bottom-left.
    #[arg(long, value_name = "X,Y", value_parser = parse_pointer, default_value = "0.5,0.5")]
    pub pointer: Vec2,

    #[command(flatten)]
    pub shared: SharedArgs,
}

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration (defaults merged with the file) as TOML.
    Show,
    /// Print the path of the configuration file.
    Where,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4/8/16")
            })?;

            if samples == 1 {
                return Ok(Antialiasing::Off);
            }

            if !matches!(samples, 2 | 4 | 8 | 16) {
                return Err(format!(
                    "unsupported sample count {samples}; supported values are 2, 4, 8, or 16"
                ));
            }

            Ok(Antialiasing::Samples(samples))
        }
    }
}

pub fn parse_color_space(value: &str) -> Result<ColorSpaceMode, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("color space must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" => Ok(ColorSpaceMode::Auto),
        "gamma" | "srgb-off" | "browser" => Ok(ColorSpaceMode::Gamma),
        "linear" | "srgb" => Ok(ColorSpaceMode::Linear),
        other => Err(format!(
            "unknown color space '{other}'; expected auto, gamma, or linear"
        )),
    }
}

pub fn parse_surface_size(spec: &str) -> Result<(u32, u32), String> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| "expected WxH format, e.g. 1920x1080".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| "invalid width in size specification".to_string())?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| "invalid height in size specification".to_string())?;

    if width == 0 || height == 0 {
        return Err("surface dimensions must be greater than zero".into());
    }

    Ok((width, height))
}

pub fn parse_aspect(value: &str) -> Result<AspectSource, String> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("texture") || trimmed.eq_ignore_ascii_case("image") {
        return Ok(AspectSource::Texture);
    }
    let (width, height) = parse_surface_size(trimmed)
        .map_err(|err| format!("{err}; or use `texture` for the image's own size"))?;
    Ok(AspectSource::Fixed {
        width: width as f32,
        height: height as f32,
    })
}

pub fn parse_pointer(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .trim()
        .split_once(',')
        .ok_or_else(|| "expected X,Y (e.g. 0.5,0.5)".to_string())?;
    let x: f32 = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid pointer x '{}'", x.trim()))?;
    let y: f32 = y
        .trim()
        .parse()
        .map_err(|_| format!("invalid pointer y '{}'", y.trim()))?;
    if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
        return Err(format!(
            "pointer ({x}, {y}) must lie within [0, 1] on both axes"
        ));
    }
    Ok(Vec2::new(x, y))
}

pub fn parse_export_path(value: &str) -> Result<PathBuf, String> {
    let path = Path::new(value);
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => Ok(path.to_path_buf()),
        None => Err("export path has no extension; expected .png".to_string()),
        Some(other) => Err(format!(
            "unsupported export format '.{other}'; expected .png"
        )),
    }
}
