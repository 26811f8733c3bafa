//! watchlog
//!
//! Runs a command and shows its stdout and stderr in a full-screen view.
//! Every line carries a relative timestamp and a color that cools as the
//! line ages, so fresh output stands out at a glance. Lines can be
//! rewritten on the way in with regex substitution rules.
//!
//! Pure core (`model`, `rules`, `state`, `integration`) and impure shell
//! (`source`, `view`, `logging`) are kept apart.

pub mod config;
pub mod logging;
pub mod model;
pub mod rules;
pub mod source;
pub mod state;
pub mod view;

// Re-export main loop integration
pub mod integration;
