//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/edhits/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/edhits/` (~/.config/edhits/)
//! - State/Logs: `$XDG_STATE_HOME/edhits/` (~/.local/state/edhits/)
//!
//! The `[preferences]` section mirrors the host's string-valued settings
//! store: values are kept as strings and only interpreted when a
//! [`SessionContext`](crate::SessionContext) is resolved from them.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Server used when no (or an empty) server preference is stored
pub const DEFAULT_SERVER: &str = "edmc.edhits.space:8080";

/// Overlay message lifetime used when the stored duration is missing or malformed
pub const DEFAULT_OVERLAY_DURATION: u64 = 4;

/// Overlay mode value that disables location advisories
pub const OVERLAY_MODE_OFF: &str = "off";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Persisted plugin preferences (server, overlay duration, overlay mode)
    #[serde(default)]
    pub preferences: Preferences,

    /// Overlay connection settings
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Advisory service settings
    #[serde(default)]
    pub advisory: AdvisoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Journal discovery for the `hits watch` host
    #[serde(default)]
    pub journal: JournalConfig,
}

/// Persisted preferences, stored as plain strings like the host's config store.
///
/// Values that are absent, empty or malformed fall back to built-in defaults
/// when resolved, so a hand-edited file can never leave the plugin unusable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// HITS server as `host:port`
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub server: Option<String>,

    /// Overlay message lifetime in seconds
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub overlay_duration: Option<String>,

    /// Traffic reports `on`/`off`
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub overlay_mode: Option<String>,
}

/// Accept any scalar for a preference and keep it as its string form.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<toml::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        toml::Value::String(s) => Some(s),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(true) => Some("on".to_string()),
        toml::Value::Boolean(false) => Some(OVERLAY_MODE_OFF.to_string()),
        _ => None,
    }))
}

/// Overlay connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// EDMCOverlay listener (`host:port`)
    #[serde(default = "default_overlay_address")]
    pub address: String,

    /// TCP connect timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Delay after acquiring the overlay before the startup notice
    #[serde(default = "default_settle")]
    pub settle_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            address: default_overlay_address(),
            connect_timeout_ms: default_connect_timeout(),
            settle_ms: default_settle(),
        }
    }
}

fn default_overlay_address() -> String {
    "127.0.0.1:5010".to_string()
}

fn default_connect_timeout() -> u64 {
    1000
}

fn default_settle() -> u64 {
    2000
}

/// HITS advisory service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// HTTP request timeout in seconds
    #[serde(default = "default_advisory_timeout")]
    pub timeout_secs: u64,

    /// Pause before each location query, in milliseconds
    #[serde(default = "default_pacing")]
    pub pacing_ms: u64,

    /// Trailing window requested for location reports
    #[serde(default = "default_hours")]
    pub hours: u32,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_advisory_timeout(),
            pacing_ms: default_pacing(),
            hours: default_hours(),
        }
    }
}

fn default_advisory_timeout() -> u64 {
    10
}

fn default_pacing() -> u64 {
    500
}

fn default_hours() -> u32 {
    24
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Mirror log events to stderr as well as the log file
    #[serde(default)]
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            stderr: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Journal directory settings used by the `hits watch` host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Directory holding `Journal.*.log` files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[serde(default = "default_poll")]
    pub poll_ms: u64,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            dir: None,
            poll_ms: default_poll(),
        }
    }
}

fn default_poll() -> u64 {
    1000
}

impl JournalConfig {
    /// Configured journal directory, else the game's default under the home directory
    pub fn resolve_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            home_dir()
                .join("Saved Games")
                .join("Frontier Developments")
                .join("Elite Dangerous")
        })
    }
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Write the whole configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/edhits/config.toml` (~/.config/edhits/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("edhits").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/edhits/` (~/.local/state/edhits/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("edhits")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/edhits/edhits.log` (~/.local/state/edhits/edhits.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("edhits.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
