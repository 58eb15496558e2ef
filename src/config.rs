// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration persistence for k8smux
//!
//! Stores hub connection defaults in a config file so multi-cluster mode
//! does not need to be re-specified on every invocation. All k8smux data is
//! stored under ~/.k8smux/:
//! - ~/.k8smux/config.json - user configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the base k8smux directory (~/.k8smux/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".k8smux"))
        .context("Could not determine home directory")
}

/// k8smux configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Hub API server URL used for tunnel route discovery
    #[serde(default)]
    pub hub_url: Option<String>,

    /// Enable multi-cluster forwarding by default
    #[serde(default)]
    pub multi_cluster: bool,

    /// Accept invalid TLS certificates from the hub/tunnel (opt-in)
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,
}

impl Config {
    /// Load config from disk, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to disk - reserved for a future `config` subcommand;
    /// flags and the file are the only inputs today
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get the config file path (~/.k8smux/config.json)
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.hub_url.is_none());
        assert!(!config.multi_cluster);
        assert!(!config.insecure_skip_tls_verify);
    }

    #[test]
    fn test_config_serialize() {
        let config = Config {
            hub_url: Some("https://api.hub.example.com:6443".to_string()),
            multi_cluster: true,
            insecure_skip_tls_verify: false,
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("hub_url"));
        assert!(json.contains("api.hub.example.com"));
    }

    #[test]
    fn test_config_deserialize_empty() {
        let json = "{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.hub_url.is_none());
        assert!(!config.multi_cluster);
        // Insecure TLS must never default on
        assert!(!config.insecure_skip_tls_verify);
    }

    #[test]
    fn test_config_roundtrip() {
        let original = Config {
            hub_url: Some("https://hub.local".to_string()),
            multi_cluster: true,
            insecure_skip_tls_verify: true,
        };
        let json = serde_json::to_string_pretty(&original).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(original.hub_url, parsed.hub_url);
        assert_eq!(original.multi_cluster, parsed.multi_cluster);
        assert_eq!(
            original.insecure_skip_tls_verify,
            parsed.insecure_skip_tls_verify
        );
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let config = Config {
            hub_url: Some("https://hub.local".to_string()),
            multi_cluster: true,
            insecure_skip_tls_verify: false,
        };
        let content = serde_json::to_string_pretty(&config).unwrap();
        fs::write(&config_path, content).unwrap();

        let loaded_content = fs::read_to_string(&config_path).unwrap();
        let loaded: Config = serde_json::from_str(&loaded_content).unwrap();
        assert_eq!(loaded.hub_url.as_deref(), Some("https://hub.local"));
        assert!(loaded.multi_cluster);
    }
}
