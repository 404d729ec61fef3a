// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for SwipeSort

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Working directories
    #[serde(default)]
    pub storage: StorageConfig,

    /// Web server settings
    #[serde(default)]
    pub web: WebConfig,

    /// Triage client behaviour
    #[serde(default)]
    pub triage: TriageConfig,
}

/// Layout of the three sibling working directories
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_pending_dir")]
    pub pending: String,
    #[serde(default = "default_approved_dir")]
    pub approved: String,
    #[serde(default = "default_declined_dir")]
    pub declined: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TriageConfig {
    /// Base URL of the service the terminal client talks to
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Delay after a successful move before the next item can be acted on
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    /// Fraction of viewport width a swipe must exceed to commit
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,
    /// Fraction of viewport width at which drag feedback saturates
    #[serde(default = "default_feedback_saturation")]
    pub feedback_saturation: f64,
    /// Nominal viewport width used by the terminal client for swipe input
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
}

// Default value functions
fn default_root() -> String { ".".to_string() }
fn default_pending_dir() -> String { "toSort".to_string() }
fn default_approved_dir() -> String { "approved".to_string() }
fn default_declined_dir() -> String { "declined".to_string() }
fn default_web_host() -> String { "0.0.0.0".to_string() }
fn default_web_port() -> u16 { 3000 }
fn default_server_url() -> String { "http://127.0.0.1:3000".to_string() }
fn default_poll_interval() -> u64 { 3000 }
fn default_settle_delay() -> u64 { 300 }
fn default_swipe_threshold() -> f64 { 0.2 }
fn default_feedback_saturation() -> f64 { 0.5 }
fn default_viewport_width() -> f64 { 1000.0 }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            pending: default_pending_dir(),
            approved: default_approved_dir(),
            declined: default_declined_dir(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            poll_interval_ms: default_poll_interval(),
            settle_delay_ms: default_settle_delay(),
            swipe_threshold: default_swipe_threshold(),
            feedback_saturation: default_feedback_saturation(),
            viewport_width: default_viewport_width(),
        }
    }
}

impl StorageConfig {
    /// Storage rooted at `root` with the default directory names
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            root: root.to_string_lossy().to_string(),
            ..Self::default()
        }
    }

    pub fn pending_path(&self) -> PathBuf {
        Path::new(&self.root).join(&self.pending)
    }

    pub fn approved_path(&self) -> PathBuf {
        Path::new(&self.root).join(&self.approved)
    }

    pub fn declined_path(&self) -> PathBuf {
        Path::new(&self.root).join(&self.declined)
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::SwipeError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde cannot express
    pub fn validate(&self) -> crate::Result<()> {
        let dirs = [&self.storage.pending, &self.storage.approved, &self.storage.declined];
        for dir in dirs {
            if dir.trim().is_empty() {
                return Err(crate::SwipeError::Config("Directory names must not be empty".to_string()));
            }
        }
        let paths = [
            self.storage.pending_path(),
            self.storage.approved_path(),
            self.storage.declined_path(),
        ];
        if paths[0] == paths[1] || paths[0] == paths[2] || paths[1] == paths[2] {
            return Err(crate::SwipeError::Config(
                "Pending, approved and declined directories must be distinct".to_string(),
            ));
        }

        let t = &self.triage;
        if !(t.swipe_threshold > 0.0 && t.swipe_threshold <= 1.0) {
            return Err(crate::SwipeError::Config(format!(
                "swipe_threshold must be in (0, 1], got {}", t.swipe_threshold
            )));
        }
        if !(t.feedback_saturation > 0.0 && t.feedback_saturation <= 1.0) {
            return Err(crate::SwipeError::Config(format!(
                "feedback_saturation must be in (0, 1], got {}", t.feedback_saturation
            )));
        }
        if !(t.viewport_width > 0.0) {
            return Err(crate::SwipeError::Config("viewport_width must be positive".to_string()));
        }
        if t.poll_interval_ms == 0 {
            return Err(crate::SwipeError::Config("poll_interval_ms must be positive".to_string()));
        }

        Ok(())
    }
}
