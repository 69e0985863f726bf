// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the poast board service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the poast board service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory holding `client.html` (default: static)
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Board limits
    #[serde(default)]
    pub board: BoardConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Limits applied to the message store and to incoming poasts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of poasts kept in memory (default: 100)
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Maximum username length in characters (default: 20)
    #[serde(default = "default_max_username_chars")]
    pub max_username_chars: usize,

    /// Maximum poast length in characters (default: 1000)
    #[serde(default = "default_max_poast_chars")]
    pub max_poast_chars: usize,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_capacity() -> usize {
    100
}

fn default_max_username_chars() -> usize {
    20
}

fn default_max_poast_chars() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            static_dir: default_static_dir(),
            board: BoardConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            max_username_chars: default_max_username_chars(),
            max_poast_chars: default_max_poast_chars(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl Config {
    /// Path of the static browser client.
    pub fn client_html_path(&self) -> PathBuf {
        self.static_dir.join("client.html")
    }
}
