//! Log storage configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Which [`LogStore`](crate::store::LogStore) implementation backs the server.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Append-only text files under `path`.
    #[default]
    File,
    /// Process memory only; nothing survives a restart.
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Backend selection (default: file).
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory holding the log files (default: "data").
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("data")
}
