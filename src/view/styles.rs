//! Hotness gradient and prefix styling.
//!
//! Provides the six bucket colors, brightest for the freshest output, and
//! the accent color used for timestamp prefixes.

use super::hotness::HotnessBucket;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag / `no_color` config key
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from resolved config and environment.
    ///
    /// Priority (first match wins):
    /// 1. `no_color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Colors explicitly on or off, ignoring the environment.
    pub fn fixed(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== HotnessStyles =====

/// Styles for the recency gradient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotnessStyles {
    buckets: [Style; 6],
    prefix: Style,
}

impl HotnessStyles {
    /// Create styles honoring the given color configuration.
    ///
    /// If colors are disabled, every style is the terminal default.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if !config.colors_enabled() {
            return Self {
                buckets: [Style::default(); 6],
                prefix: Style::default(),
            };
        }

        let bold = |color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        Self {
            buckets: [
                bold(Color::White),
                bold(Color::Cyan),
                bold(Color::Green),
                bold(Color::Blue),
                Style::default().fg(Color::Cyan),
                Style::default().fg(Color::Blue),
            ],
            prefix: Style::default().fg(Color::Green),
        }
    }

    /// Style for line text in `bucket`.
    pub fn for_bucket(&self, bucket: HotnessBucket) -> Style {
        self.buckets[bucket.index()]
    }

    /// Style for the relative timestamp prefix.
    pub fn prefix(&self) -> Style {
        self.prefix
    }
}

impl Default for HotnessStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====
