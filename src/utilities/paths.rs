// Path Utilities
// Locating the console configuration file

use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_NAME: &str = "dnsfilter-console.yaml";

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "DNSFILTER_CONSOLE_CONFIG";

/// Where a configuration path came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line or through the environment; must exist
    Explicit(PathBuf),
    /// The working-directory default; may be absent
    Default(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(path) | Self::Default(path) => path,
        }
    }
}

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                components.pop();
            }
            std::path::Component::CurDir => {}
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Resolve a path relative to a base directory
pub fn resolve_path(base: &Path, relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        normalize_path(&base.join(relative))
    }
}

/// Pick the config file: flag, then environment, then working directory
pub fn locate_config(flag: Option<&Path>, env_value: Option<&str>, cwd: &Path) -> ConfigSource {
    if let Some(path) = flag {
        return ConfigSource::Explicit(resolve_path(cwd, path));
    }

    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return ConfigSource::Explicit(resolve_path(cwd, Path::new(value.trim())));
    }

    ConfigSource::Default(cwd.join(DEFAULT_CONFIG_NAME))
}
