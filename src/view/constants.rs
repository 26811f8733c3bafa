//! Process exit statuses.

/// Status the viewer exits with once it stops, whatever the reason.
pub const VIEWER_EXIT_STATUS: u8 = 1;

/// Status for fatal startup errors (bad rule, no command, unreadable config).
pub const FATAL_EXIT_STATUS: u8 = 2;
