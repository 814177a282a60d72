use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Store-wide defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Simulated backend round-trip in milliseconds (default: 0).
    #[serde(default)]
    pub latency_ms: u64,
    /// Rows per page in list views (default: 20).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Name stamped into `created_by` / `last_edited_by`.
    #[serde(default = "default_current_user")]
    pub current_user: String,
}

/// Thresholds used by winner determination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Minimum confidence (percent) before a winner is declared (default: 95).
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Impressions every variant needs before significance is reported (default: 1000).
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: u64,
    /// Confidence used by sample-size planning (default: 95).
    #[serde(default = "default_confidence")]
    pub default_confidence: u32,
    /// Statistical power used by sample-size planning (default: 80).
    #[serde(default = "default_power")]
    pub default_power: u32,
}

/// Where persisted UI state lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for persisted UI state. `None` uses the platform data dir.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    /// Mirror filters, sorting and edit buffers to disk (default: true).
    #[serde(default = "default_persist_ui_state")]
    pub persist_ui_state: bool,
}

fn default_page_size() -> usize {
    20
}

fn default_current_user() -> String {
    "current-user".to_string()
}

fn default_min_confidence() -> f64 {
    95.0
}

fn default_min_sample_size() -> u64 {
    1000
}

fn default_confidence() -> u32 {
    95
}

fn default_power() -> u32 {
    80
}

fn default_persist_ui_state() -> bool {
    true
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            latency_ms: 0,
            page_size: default_page_size(),
            current_user: default_current_user(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            min_sample_size: default_min_sample_size(),
            default_confidence: default_confidence(),
            default_power: default_power(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            persist_ui_state: default_persist_ui_state(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            stats: StatsConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl StorageConfig {
    /// Resolved state directory.
    ///
    /// Falls back to `dirs::data_dir()/campaign-desk`, then to the current directory.
    pub fn resolved_state_dir(&self) -> PathBuf {
        if let Some(dir) = &self.state_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("campaign-desk")
    }
}
