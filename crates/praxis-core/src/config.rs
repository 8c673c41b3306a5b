//! Configuration module for the sync engine.
//!
//! Typed configuration structs that map to the YAML configuration file, with
//! loading, defaults, and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the calendar sync engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarConfig,
    pub sync: SyncConfig,
    pub notifications: NotificationsConfig,
}

/// External calendar service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Base URL of the provider's REST API.
    pub base_url: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            base_url: "https://calendar.example.com/api/v3".to_string(),
        }
    }
}

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Days ahead of "today" the event listing window covers.
    pub lookahead_days: u32,
    /// Duration assumed for events published from sessions, which carry no
    /// end time of their own.
    pub default_session_minutes: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            lookahead_days: 30,
            default_session_minutes: 60,
        }
    }
}

/// Notification delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Master switch for user-visible toasts.
    pub enabled: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Validates value ranges.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sync.lookahead_days < 1 {
            anyhow::bail!("sync.lookahead_days must be at least 1");
        }
        if self.sync.default_session_minutes < 5 {
            anyhow::bail!("sync.default_session_minutes must be at least 5");
        }
        if self.calendar.base_url.trim().is_empty() {
            anyhow::bail!("calendar.base_url must not be empty");
        }
        Ok(())
    }
}
