use std::path::{Path, PathBuf};

use agora_core::{AgoraError, AgoraResult};
use agora_memory::DEFAULT_SEARCH_LIMIT;
use serde::Deserialize;

/// Contents of `agora.toml`. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgoraConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_store_file")]
    pub store_file: String,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Default for AgoraConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store_file: default_store_file(),
            search: SearchConfig::default(),
            log: LogConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./memory_store")
}
fn default_store_file() -> String {
    "records.json".to_string()
}
fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl AgoraConfig {
    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> AgoraResult<Self> {
        let exists = path.try_exists().map_err(|e| {
            AgoraError::Config(format!("Failed to stat config file '{}': {e}", path.display()))
        })?;
        if !exists {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AgoraError::Config(format!("Failed to read config file '{}': {e}", path.display()))
        })?;
        Self::parse(&raw)
            .map_err(|e| AgoraError::Config(format!("Invalid config '{}': {e}", path.display())))
    }

    fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Location of the record snapshot.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.store_file)
    }
}
