use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default value for `poll_interval_ms` in [`ReconcilerConfig`].
const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;

/// Default value for `sync_interval_ms` in [`ReconcilerConfig`].
const DEFAULT_SYNC_INTERVAL_MS: u64 = 10_000;

/// Timing knobs for the request reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// How often each request watcher polls the chain, in ms.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// How often the active account's request set is resynced, in ms.
    #[serde(default = "default_sync_interval")]
    pub sync_interval_ms: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            sync_interval_ms: DEFAULT_SYNC_INTERVAL_MS,
        }
    }
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_sync_interval() -> u64 {
    DEFAULT_SYNC_INTERVAL_MS
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Directory path for file-based logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Prefix for log file names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file_prefix: Option<String>,

    /// Use JSON format for logs instead of compact format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_format: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Reconciler timings (optional section in TOML).
    #[serde(default)]
    pub reconciler: ReconcilerConfig,

    /// Logging configuration (optional section in TOML).
    #[serde(default)]
    pub logging: LoggingConfig,
}
