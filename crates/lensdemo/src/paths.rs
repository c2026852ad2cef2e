use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

use crate::config::CONFIG_FILE_NAME;

pub const ENV_CONFIG_DIR: &str = "LENSDEMO_CONFIG_DIR";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "Lensdemo";
const APPLICATION: &str = "lensdemo";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        if let Some(config_dir) = env_override(ENV_CONFIG_DIR) {
            return Ok(Self { config_dir });
        }
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
            .ok_or_else(|| anyhow!("failed to determine user directories"))?;
        Ok(Self {
            config_dir: project_dirs.config_dir().to_path_buf(),
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }
}

#[cfg(test)]
impl AppPaths {
    pub fn from_raw(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }
}

/// The explicit `--config` path when given, otherwise the discovered file.
pub fn resolve_config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(AppPaths::discover()?.config_file()),
    }
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.as_os_str().is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_lives_in_config_dir() {
        let paths = AppPaths::from_raw(PathBuf::from("/tmp/lensdemo-config"));
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/tmp/lensdemo-config/lensdemo.toml")
        );
    }

    #[test]
    fn explicit_config_path_wins() {
        let explicit = Path::new("/etc/lens.toml");
        assert_eq!(
            resolve_config_file(Some(explicit)).unwrap(),
            PathBuf::from("/etc/lens.toml")
        );
    }
}
