// Configuration loading module
// Console settings read from YAML, with built-in defaults for every section

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::CollectionKind;

/// Console configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Where the appliance webservice lives
    pub appliance: ApplianceConfig,

    /// Container identifiers and labels for the three lists
    pub lists: ListContainers,

    /// Reconciliation behaviour
    pub sync: SyncSettings,

    pub logging: LoggingConfig,

    pub ui: UiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplianceConfig {
    /// Base URL of the appliance webservice
    pub base_url: String,
}

impl Default for ApplianceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Identifies one list container in the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListContainer {
    /// Stable identifier, used in logs
    pub id: String,

    /// Panel title
    pub title: String,

    /// Text shown on the new-entry row while it is empty
    #[serde(default)]
    pub input_placeholder: String,
}

impl ListContainer {
    fn new(id: &str, title: &str, input_placeholder: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            input_placeholder: input_placeholder.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListContainers {
    pub domains: ListContainer,
    pub sites: ListContainer,
    pub devices: ListContainer,
}

impl ListContainers {
    pub fn get(&self, kind: CollectionKind) -> &ListContainer {
        match kind {
            CollectionKind::Domains => &self.domains,
            CollectionKind::Sites => &self.sites,
            CollectionKind::Devices => &self.devices,
        }
    }
}

impl Default for ListContainers {
    fn default() -> Self {
        Self {
            domains: ListContainer::new("domain-list", "Blocked domains", "+ add domain"),
            sites: ListContainer::new("site-list", "Trusted sites", "+ add site"),
            devices: ListContainer::new("device-list", "Devices", ""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Ignore a fetch result older than the one already displayed
    pub discard_stale_fetches: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            discard_stale_fetches: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub level: String,

    /// Log file; the console discards logs when unset
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Event poll interval in milliseconds
    pub tick_ms: u64,

    /// Failure notices kept for the footer
    pub notice_capacity: usize,

    /// Seconds a failure notice stays in the footer
    pub notice_secs: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            notice_capacity: 20,
            notice_secs: 10,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read console config: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse console config: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ConsoleConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Render the effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize console config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ConsoleConfig::from_yaml(
            "appliance:\n  base_url: http://filter.lan:8080\nsync:\n  discard_stale_fetches: false\n",
        )
        .unwrap();

        assert_eq!(config.appliance.base_url, "http://filter.lan:8080");
        assert!(!config.sync.discard_stale_fetches);
        assert_eq!(config.lists, ListContainers::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(ConsoleConfig::from_yaml("").unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn yaml_written_out_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dnsfilter-console.yaml");

        let mut config = ConsoleConfig::default();
        config.lists.sites.title = "Allowed".to_string();
        fs::write(&path, config.to_yaml().unwrap()).unwrap();

        assert_eq!(ConsoleConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConsoleConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read console config"));
    }
}
