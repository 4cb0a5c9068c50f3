//! Core configuration structures for the worklist coordination layer

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scheduler configuration
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Consistency validator configuration
    #[serde(default)]
    pub consistency: ConsistencyConfig,

    /// Metrics exporter configuration
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Classification list extensions
    #[serde(default)]
    pub classification: ClassificationConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted log lines
    #[serde(default)]
    pub json: bool,
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Bound on retained performance samples per routing category
    #[serde(default = "default_max_samples")]
    pub max_samples_per_category: usize,

    /// Persist performance samples to the session store when one is attached
    #[serde(default = "default_true")]
    pub persist_samples: bool,
}

/// Consistency validator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyConfig {
    /// Expectations older than this are no longer checked (seconds)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Hard cap on retained expectations, oldest evicted first
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

/// Metrics exporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable the /metrics HTTP exporter
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Bind address for the exporter
    #[serde(default = "default_metrics_addr")]
    pub bind_addr: String,

    /// Exporter port
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Per-context extensions to the curated classification lists.
///
/// Keys are view-context identifiers (`task-worklist`, `medical-data`,
/// `billing`, `generic`); values are operation-type lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationConfig {
    #[serde(default)]
    pub extra_queue_required: HashMap<String, Vec<String>>,

    #[serde(default)]
    pub extra_bypass_eligible: HashMap<String, Vec<String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_samples_per_category: default_max_samples(),
            persist_samples: true,
        }
    }
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_entries: default_max_entries(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_addr: default_metrics_addr(),
            port: default_metrics_port(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_samples() -> usize {
    200
}

fn default_window_secs() -> u64 {
    30
}

fn default_max_entries() -> usize {
    256
}

fn default_metrics_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_metrics_port() -> u16 {
    9464
}
