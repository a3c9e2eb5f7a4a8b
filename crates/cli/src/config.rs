//! TOML configuration for the `cellring` tool.
//!
//! Every section is optional; a missing file means all defaults.
//!
//! ```toml
//! [ring]
//! virtual_nodes = 150
//! hash = "blake3"
//!
//! [registry]
//! path = "cells.json"
//!
//! [routing]
//! custom_domain = "example.org"
//!
//! [log]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use cellring::RingConfig;
use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Ring shape: virtual nodes per unit weight and hash algorithm.
    pub ring: RingConfig,
    /// Where the cell snapshot comes from.
    pub registry: RegistrySection,
    /// Redirect target settings.
    pub routing: RoutingSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[registry]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    /// JSON file holding the cell records.
    pub path: PathBuf,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("cells.json"),
        }
    }
}

/// `[routing]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoutingSection {
    /// Domain cells are served under (`cell-<id>.<domain>`). Empty falls back
    /// to `<id>.example.com`.
    pub custom_domain: String,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::from_toml(&content)
                    .with_context(|| format!("parsing config {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellring::HashAlgorithm;

    #[test]
    fn test_empty_config_is_default() {
        let config = CliConfig::from_toml("").unwrap();
        assert_eq!(config.ring, RingConfig::default());
        assert_eq!(config.registry.path, PathBuf::from("cells.json"));
        assert!(config.routing.custom_domain.is_empty());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            [ring]
            virtual_nodes = 64
            hash = "xxh3"

            [registry]
            path = "/var/lib/cells.json"

            [routing]
            custom_domain = "cells.example.org"

            [log]
            level = "debug"
        "#;
        let config = CliConfig::from_toml(toml).unwrap();
        assert_eq!(config.ring.virtual_nodes, 64);
        assert_eq!(config.ring.hash, HashAlgorithm::Xxh3);
        assert_eq!(config.registry.path, PathBuf::from("/var/lib/cells.json"));
        assert_eq!(config.routing.custom_domain, "cells.example.org");
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_unknown_hash_is_rejected() {
        assert!(CliConfig::from_toml("[ring]\nhash = \"md5\"").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/cellring.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
