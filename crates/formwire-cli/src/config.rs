// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! formwire project configuration.
//!
//! Configuration is loaded from `formwire.toml` at the project root.
//!
//! # Example Configuration
//!
//! ```toml
//! [project]
//! name = "todos"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! static_dir = "static"
//! max_body_bytes = 1048576
//!
//! [store]
//! data_dir = ".formwire/data"
//!
//! [actions]
//! expose_fault_details = false
//! state_capacity = 1024
//! state_ttl_secs = 300
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use formwire::actions::{ChannelConfig, ExecutorConfig};

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "formwire.toml";

/// Main configuration structure loaded from `formwire.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Todo store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Action execution settings.
    #[serde(default)]
    pub actions: ActionsConfig,
}

/// Project metadata configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Project name (default: "unnamed").
    #[serde(default = "default_name")]
    pub name: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host (default: "127.0.0.1").
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under `/static` (default: "static").
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Largest accepted request body; bigger bodies get 413 (default: 1 MiB).
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Todo store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory holding `todos.db` (default: ".formwire/data").
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

/// Action execution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActionsConfig {
    /// Show raw fault messages to clients (default: false).
    #[serde(default)]
    pub expose_fault_details: bool,
    /// Pending action states kept across all sessions (default: 1024).
    #[serde(default = "default_state_capacity")]
    pub state_capacity: usize,
    /// Seconds an unconsumed action state stays readable (default: 300).
    #[serde(default = "default_state_ttl_secs")]
    pub state_ttl_secs: u64,
}

fn default_name() -> String {
    "unnamed".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_data_dir() -> String {
    ".formwire/data".to_string()
}

fn default_state_capacity() -> usize {
    1024
}

fn default_state_ttl_secs() -> u64 {
    300
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { name: default_name() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            expose_fault_details: false,
            state_capacity: default_state_capacity(),
            state_ttl_secs: default_state_ttl_secs(),
        }
    }
}

impl ActionsConfig {
    /// Executor settings derived from this section.
    pub fn executor(&self) -> ExecutorConfig {
        ExecutorConfig {
            expose_fault_details: self.expose_fault_details,
        }
    }

    /// Result channel limits derived from this section.
    pub fn channel(&self) -> ChannelConfig {
        ChannelConfig {
            capacity: self.state_capacity,
            ttl: Duration::from_secs(self.state_ttl_secs),
        }
    }
}

impl Config {
    /// Loads configuration from `formwire.toml` in the current directory.
    ///
    /// If no configuration file exists, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads configuration from an explicit path, falling back to defaults
    /// when the file does not exist.
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
