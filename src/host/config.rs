//! Host configuration read from TOML.
//!
//! ```toml
//! [connection]
//! host = "127.0.0.1"
//! port = 8809
//!
//! [shards]
//! disabled = ["voltagetransformer"]
//! config_dir = "shard-config"
//! ```
//!
//! Every field has a default, so an empty or missing file yields [`HostConfig::default`].

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ShardError, ShardResult};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub connection: ConnectionConfig,
    pub shards: ShardsConfig,
}

/// Address a transport front end binds to.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8809,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShardsConfig {
    /// Built-in shard ids that are not registered.
    pub disabled: Vec<String>,
    /// Directory holding `<shard id>.toml` for shards that take a config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_dir: Option<PathBuf>,
}

impl ShardsConfig {
    pub fn is_enabled(&self, id: &str) -> bool {
        !self.disabled.iter().any(|d| d == id)
    }

    /// Config file handed to `id` at initialization, if a config directory is set.
    pub fn config_path(&self, id: &str) -> Option<PathBuf> {
        self.config_dir
            .as_ref()
            .map(|dir| dir.join(format!("{id}.toml")))
    }
}

impl HostConfig {
    pub fn from_toml_str(text: &str) -> ShardResult<Self> {
        toml::from_str(text).map_err(|e| ShardError::serde(format!("host config: {e}")))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> ShardResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> ShardResult<String> {
        toml::to_string_pretty(self).map_err(|e| ShardError::serde(format!("host config: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/config.rs"]
mod tests;
