//! Configuration file loading with precedence handling.
//!
//! The file only carries viewer settings. Substitution rules are never read
//! from it; they come from `--gsub` and friends on the command line.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default redraw interval when nothing arrives.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Lower bound on the redraw interval.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/watchlog/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Redraw interval in milliseconds.
    #[serde(default)]
    pub tick_interval_ms: Option<u64>,

    /// Disable colors.
    #[serde(default)]
    pub no_color: Option<bool>,

    /// Exit with the child's status when the child ends the session.
    #[serde(default)]
    pub propagate_exit_code: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Redraw interval, never below [`MIN_TICK_INTERVAL`].
    pub tick_interval: Duration,
    /// Colors disabled.
    pub no_color: bool,
    /// Surface the child's exit code instead of the fixed viewer status.
    pub propagate_exit_code: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            no_color: false,
            propagate_exit_code: false,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/watchlog/watchlog.log` on Linux, or the
/// appropriate platform path elsewhere. Falls back to the current directory
/// if no state directory can be determined.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("watchlog").join("watchlog.log")
    } else {
        PathBuf::from("watchlog.log")
    }
}

/// Resolve default config file path.
///
/// Returns `~/.config/watchlog/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("watchlog").join("config.toml"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `WATCHLOG_CONFIG` environment variable
/// 3. Default path `~/.config/watchlog/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("WATCHLOG_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        tick_interval: config
            .tick_interval_ms
            .map(tick_from_millis)
            .unwrap_or(defaults.tick_interval),
        no_color: config.no_color.unwrap_or(defaults.no_color),
        propagate_exit_code: config
            .propagate_exit_code
            .unwrap_or(defaults.propagate_exit_code),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `WATCHLOG_TICK_MS`: Override redraw interval (ignored unless it is an integer)
/// - `WATCHLOG_LOG_FILE`: Override log file path
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(millis) = std::env::var("WATCHLOG_TICK_MS")
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
    {
        config.tick_interval = tick_from_millis(millis);
    }

    if let Ok(path) = std::env::var("WATCHLOG_LOG_FILE") {
        config.log_file_path = PathBuf::from(path);
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    tick_ms_override: Option<u64>,
    no_color_override: Option<bool>,
    exit_code_override: Option<bool>,
    log_file_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(millis) = tick_ms_override {
        config.tick_interval = tick_from_millis(millis);
    }

    if let Some(no_color) = no_color_override {
        config.no_color = no_color;
    }

    if let Some(propagate) = exit_code_override {
        config.propagate_exit_code = propagate;
    }

    if let Some(path) = log_file_override {
        config.log_file_path = path;
    }

    config
}

fn tick_from_millis(millis: u64) -> Duration {
    Duration::from_millis(millis).max(MIN_TICK_INTERVAL)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
