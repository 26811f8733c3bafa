//! Domain model types (pure).
//!
//! All types in this module are plain data; nothing here performs I/O.

pub mod error;
pub mod key_action;
pub mod log_line;

// Re-export for convenience
pub use error::{AppError, RuleError, SpawnError, SubstitutionError, ViewerError};
pub use key_action::KeyAction;
pub use log_line::{LogLine, Source};
