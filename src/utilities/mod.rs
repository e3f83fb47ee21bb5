// Utilities module
// Helper functions and tools

pub mod paths;

pub use paths::{locate_config, normalize_path, resolve_path, ConfigSource, CONFIG_ENV_VAR, DEFAULT_CONFIG_NAME};
