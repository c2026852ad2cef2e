use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use refraction::{AspectSource, LensParams};
use renderer::{Antialiasing, ColorSpaceMode, RendererConfig};
use serde::{Deserialize, Serialize};

use crate::cli::{parse_antialias, parse_color_space, parse_surface_size, RunArgs, SharedArgs};

pub const CONFIG_FILE_NAME: &str = "lensdemo.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// On-disk shape of `lensdemo.toml`.
///
/// ```toml
/// image = "wallpaper.jpg"
///
/// [window]
/// size = "1280x720"
/// title = "Lens Bubble"
///
/// [render]
/// antialias = "4"
/// color_space = "auto"
/// resync_on_resize = false
///
/// [lens]
/// radius = 0.3
///
/// [aspect]
/// mode = "texture"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    pub window: WindowSection,
    pub render: RenderSection,
    pub lens: LensParams,
    pub aspect: AspectSource,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub antialias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_space: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resync_on_resize: Option<bool>,
}

impl ConfigFile {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Reads `path`, treating a missing file as an empty configuration.
    ///
    /// A relative `image` is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut file = Self::from_toml_str(&contents)?;
        if let (Some(image), Some(base)) = (file.image.as_mut(), path.parent()) {
            if image.is_relative() {
                *image = base.join(&*image);
            }
        }
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(file)
    }
}

/// Effective settings after layering defaults, the config file and CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub image: Option<PathBuf>,
    pub size: (u32, u32),
    pub title: String,
    pub antialias: Antialiasing,
    pub color_space: ColorSpaceMode,
    pub resync_on_resize: bool,
    pub lens: LensParams,
    pub aspect: AspectSource,
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = RendererConfig::default();
        Self {
            image: None,
            size: defaults.surface_size,
            title: defaults.title,
            antialias: defaults.antialiasing,
            color_space: defaults.color_space,
            resync_on_resize: defaults.resync_on_resize,
            lens: defaults.lens,
            aspect: defaults.aspect,
        }
    }
}

impl Settings {
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.image = file.image;
        if let Some(size) = file.window.size.as_deref() {
            settings.size = parse_surface_size(size)
                .map_err(|err| ConfigError::Invalid(format!("window.size: {err}")))?;
        }
        if let Some(title) = file.window.title {
            settings.title = title;
        }
        if let Some(antialias) = file.render.antialias.as_deref() {
            settings.antialias = parse_antialias(antialias)
                .map_err(|err| ConfigError::Invalid(format!("render.antialias: {err}")))?;
        }
        if let Some(color_space) = file.render.color_space.as_deref() {
            settings.color_space = parse_color_space(color_space)
                .map_err(|err| ConfigError::Invalid(format!("render.color_space: {err}")))?;
        }
        if let Some(resync) = file.render.resync_on_resize {
            settings.resync_on_resize = resync;
        }
        settings.lens = file.lens;
        settings.aspect = file.aspect;
        settings.validate()?;
        Ok(settings)
    }

    /// Fully populated file form, used by `config show`.
    pub fn to_file(&self) -> ConfigFile {
        ConfigFile {
            image: self.image.clone(),
            window: WindowSection {
                size: Some(format!("{}x{}", self.size.0, self.size.1)),
                title: Some(self.title.clone()),
            },
            render: RenderSection {
                antialias: Some(self.antialias.to_string()),
                color_space: Some(self.color_space.to_string()),
                resync_on_resize: Some(self.resync_on_resize),
            },
            lens: self.lens,
            aspect: self.aspect,
        }
    }

    pub fn apply_shared(&mut self, args: &SharedArgs) {
        if let Some(size) = args.size {
            self.size = size;
        }
        if let Some(aspect) = args.aspect {
            self.aspect = aspect;
        }
        if let Some(radius) = args.radius {
            self.lens.radius = radius;
        }
        if let Some(amplitude) = args.noise_amplitude {
            self.lens.noise_amplitude = amplitude;
        }
    }

    pub fn apply_run(&mut self, args: &RunArgs) {
        if let Some(image) = &args.image {
            self.image = Some(image.clone());
        }
        self.apply_shared(&args.shared);
        if let Some(title) = &args.title {
            self.title = title.clone();
        }
        if let Some(antialias) = args.antialias {
            self.antialias = antialias;
        }
        if let Some(color_space) = args.color_space {
            self.color_space = color_space;
        }
        if args.resync_on_resize {
            self.resync_on_resize = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lens
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        self.aspect
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(())
    }

    /// The image to render, or an error telling the user how to supply one.
    pub fn require_image(&self) -> Result<&Path, ConfigError> {
        self.image.as_deref().ok_or_else(|| {
            ConfigError::Invalid(
                "no image given; pass IMAGE or set `image` in the configuration file".into(),
            )
        })
    }

    pub fn renderer_config(&self) -> Result<RendererConfig, ConfigError> {
        Ok(RendererConfig {
            surface_size: self.size,
            image_path: self.require_image()?.to_path_buf(),
            title: self.title.clone(),
            lens: self.lens,
            aspect: self.aspect,
            resync_on_resize: self.resync_on_resize,
            antialiasing: self.antialias,
            color_space: self.color_space,
        })
    }
}
