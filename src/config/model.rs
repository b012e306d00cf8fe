//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a default matching the built-in behavior, so the
//! application works without a config file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub sand: SandConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Toast and refresh settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a toast stays on screen.
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
    /// UI tick period; toasts are cleared on the first tick past their deadline.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_secs: default_toast_secs(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl UiConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// Sand grid dimensions and animation pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    /// Minimum time between frames when grains spawn slower than this.
    #[serde(default = "default_frame_cap_ms")]
    pub frame_cap_ms: u64,
    /// Any color name ratatui understands (`"blue"`, `"lightyellow"`, `"#c0a060"`).
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for SandConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            frame_cap_ms: default_frame_cap_ms(),
            color: default_color(),
        }
    }
}

/// Diagnostic log file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// `trace`, `debug`, `info`, `warn` or `error`.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: default_log_dir(),
            level: default_level(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_toast_secs() -> u64 {
    2
}
fn default_tick_ms() -> u64 {
    100
}
fn default_width() -> usize {
    5
}
fn default_height() -> usize {
    50
}
fn default_frame_cap_ms() -> u64 {
    100
}
fn default_color() -> String {
    "blue".to_string()
}
fn default_log_dir() -> String {
    "~/.local/share/sandtimer/logs".to_string()
}
fn default_level() -> String {
    "info".to_string()
}
