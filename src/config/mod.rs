//! Configuration module.
//!
//! Viewer settings resolve through defaults, the TOML file, environment
//! variables and CLI flags, in that order.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig, DEFAULT_TICK_INTERVAL, MIN_TICK_INTERVAL,
};
