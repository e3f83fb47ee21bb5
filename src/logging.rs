// Logging
// tracing subscriber setup for the console and the headless tool

use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file; the terminal UI owns stdout
    File(PathBuf),
    Stderr,
    /// No subscriber is installed
    Off,
}

/// Pick the filter directive from the config level and command-line flags
pub fn resolve_level(config_level: &str, debug: bool, quiet: bool) -> String {
    if debug {
        "debug".to_string()
    } else if quiet {
        "error".to_string()
    } else if config_level.trim().is_empty() {
        "info".to_string()
    } else {
        config_level.trim().to_string()
    }
}

/// Build the filter, letting RUST_LOG override the configured level
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = level.to_string();

        // Connection-level chatter from the HTTP stack
        for noisy in ["hyper", "hyper_util", "reqwest", "rustls"] {
            if !filter.contains(noisy) {
                filter.push_str(&format!(",{noisy}=warn"));
            }
        }

        EnvFilter::new(filter)
    })
}

/// Install the global tracing subscriber
pub fn init_logging(level: &str, target: &LogTarget) -> Result<()> {
    let filter = env_filter(level);

    let installed = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    installed.map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_configured_level() {
        assert_eq!(resolve_level("warn", true, false), "debug");
        assert_eq!(resolve_level("warn", false, true), "error");
        assert_eq!(resolve_level("warn", true, true), "debug");
        assert_eq!(resolve_level(" trace ", false, false), "trace");
        assert_eq!(resolve_level("", false, false), "info");
    }

    #[test]
    fn off_installs_nothing() {
        assert!(init_logging("info", &LogTarget::Off).is_ok());
    }
}
