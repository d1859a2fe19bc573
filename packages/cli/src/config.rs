use designlens_extractor::FilterMode;
use designlens_resolver::{EvictionPolicy, DEFAULT_STYLE_BATCH_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "designlens.config.json";

/// Designlens configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding `<fileKey>.json` snapshots
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    #[serde(default)]
    pub include_hidden: bool,

    #[serde(default)]
    pub filter_mode: FilterMode,

    #[serde(default = "default_style_batch_size")]
    pub style_batch_size: usize,

    /// Grid style cache size; absent means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_cache_capacity: Option<usize>,

    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_snapshot_dir() -> String {
    "snapshots".to_string()
}

fn default_style_batch_size() -> usize {
    DEFAULT_STYLE_BATCH_SIZE
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute path to the snapshot directory
    pub fn snapshot_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.snapshot_dir)
    }

    pub fn eviction_policy(&self) -> EvictionPolicy {
        EvictionPolicy::from_capacity(self.grid_cache_capacity)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            max_depth: None,
            include_hidden: false,
            filter_mode: FilterMode::Prune,
            style_batch_size: default_style_batch_size(),
            grid_cache_capacity: None,
            pretty: default_pretty(),
        }
    }
}
