// Configuration validation module

use anyhow::{bail, Result};
use reqwest::Url;
use std::collections::HashSet;
use std::path::Path;

use crate::config::ConsoleConfig;
use crate::core::CollectionKind;
use crate::utilities::{locate_config, ConfigSource, CONFIG_ENV_VAR};

/// A validated configuration and where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ConsoleConfig,
    pub source: ConfigSource,
    /// False when the default file was absent and built-in defaults apply
    pub from_file: bool,
}

impl LoadedConfig {
    /// Report the config source; call once logging is installed
    pub fn log_source(&self) {
        let path = self.source.path().display();
        if self.from_file {
            tracing::info!(path = %path, "Loaded console config");
        } else {
            tracing::warn!(path = %path, "No console config found, using defaults");
        }
    }
}

/// Load and validate configuration with error recovery.
///
/// A missing default file falls back to built-in defaults; a missing file that
/// was asked for explicitly is an error.
pub fn load_and_validate_config(flag: Option<&Path>) -> Result<LoadedConfig> {
    let env_value = std::env::var(CONFIG_ENV_VAR).ok();
    let cwd = std::env::current_dir()?;
    let source = locate_config(flag, env_value.as_deref(), &cwd);

    let (config, from_file) = match &source {
        ConfigSource::Explicit(path) => (ConsoleConfig::load(path)?, true),
        ConfigSource::Default(path) if path.exists() => (ConsoleConfig::load(path)?, true),
        ConfigSource::Default(_) => (ConsoleConfig::default(), false),
    };

    validate_config(&config)?;
    Ok(LoadedConfig {
        config,
        source,
        from_file,
    })
}

/// Reject settings the console cannot run with
pub fn validate_config(config: &ConsoleConfig) -> Result<()> {
    let url = match Url::parse(&config.appliance.base_url) {
        Ok(url) => url,
        Err(e) => bail!("appliance.base_url '{}' is not a URL: {}", config.appliance.base_url, e),
    };
    if !matches!(url.scheme(), "http" | "https") {
        bail!("appliance.base_url must use http or https, got '{}'", url.scheme());
    }

    let mut seen = HashSet::new();
    for kind in CollectionKind::ALL {
        let container = config.lists.get(kind);
        if container.id.trim().is_empty() {
            bail!("lists.{kind}.id must not be blank");
        }
        if !seen.insert(container.id.as_str()) {
            bail!("lists.{kind}.id '{}' is used by another list", container.id);
        }
    }

    if config.ui.tick_ms == 0 {
        bail!("ui.tick_ms must be greater than zero");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&ConsoleConfig::default()).is_ok());
    }

    #[test]
    fn rejects_bad_base_url() {
        let mut config = ConsoleConfig::default();
        config.appliance.base_url = "filter.lan".to_string();
        assert!(validate_config(&config).is_err());

        config.appliance.base_url = "ftp://filter.lan".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn rejects_duplicate_and_blank_container_ids() {
        let mut config = ConsoleConfig::default();
        config.lists.sites.id = config.lists.domains.id.clone();
        assert!(validate_config(&config).is_err());

        let mut config = ConsoleConfig::default();
        config.lists.devices.id = " ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(load_and_validate_config(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_file_is_loaded_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.yaml");
        std::fs::write(&path, "appliance:\n  base_url: https://filter.lan\n").unwrap();

        let loaded = load_and_validate_config(Some(&path)).unwrap();
        assert_eq!(loaded.config.appliance.base_url, "https://filter.lan");
        assert!(loaded.from_file);
        assert_eq!(loaded.source, ConfigSource::Explicit(path.clone()));

        std::fs::write(&path, "appliance:\n  base_url: nowhere\n").unwrap();
        assert!(load_and_validate_config(Some(&path)).is_err());
    }

    #[test]
    fn missing_default_file_falls_back_and_is_reported_later() {
        let dir = tempfile::tempdir().unwrap();
        let source = ConfigSource::Default(dir.path().join("dnsfilter-console.yaml"));
        let loaded = LoadedConfig {
            config: ConsoleConfig::default(),
            source,
            from_file: false,
        };

        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let writer = {
            let seen = std::sync::Arc::clone(&seen);
            move || CaptureWriter(std::sync::Arc::clone(&seen))
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || loaded.log_source());

        let output = String::from_utf8(seen.lock().unwrap().clone()).unwrap();
        assert!(output.contains("No console config found, using defaults"));
        assert!(output.contains("WARN"));
    }

    struct CaptureWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
