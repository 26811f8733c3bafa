//! Error types for watchlog.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via `?` and
//! `From` conversions into [`AppError`], which `main` reports on the viewer's own stderr.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for everything that can abort startup or the viewer
//!   - [`ConfigError`] - Config file could not be read or parsed
//!   - [`RuleError`] - A `--gsub` pattern failed to compile
//!   - [`SpawnError`] - The command could not be started or its pipes were missing
//!   - [`LoggingError`] - The tracing subscriber could not be installed
//!   - [`ViewerError`] - Terminal failures while the viewer is running
//!
//! # Recovery Strategy
//!
//! Configuration, rule and spawn errors are **fatal** and are raised before the terminal
//! is taken over, so printing them directly is safe. [`SubstitutionError`] is the one
//! runtime error in the domain and is **non-fatal**: the rule that failed leaves the line
//! untouched and the loop keeps running. Stream read errors never surface as values at
//! all; they end that stream's reader.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
///
/// # Examples
///
/// ```
/// use watchlog::model::error::{AppError, SpawnError};
///
/// let err: AppError = SpawnError::EmptyCommand.into();
/// assert!(err.to_string().contains("no command"));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Config file exists but could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A substitution pattern could not be compiled.
    ///
    /// The viewer must not start with broken rules.
    #[error("{0}")]
    Rule(#[from] RuleError),

    /// The child process could not be started.
    #[error("{0}")]
    Spawn(#[from] SpawnError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal setup, drawing or teardown failed.
    #[error("{0}")]
    Viewer(#[from] ViewerError),
}

/// A substitution pattern that failed to compile.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The regular expression is not valid syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use watchlog::rules::{RuleEngine, StreamSelector};
    ///
    /// let mut engine = RuleEngine::new();
    /// let err = engine.add("(", "", StreamSelector::Both).unwrap_err();
    /// assert!(err.to_string().contains("can't parse <<(>>"));
    /// ```
    #[error("can't parse <<{pattern}>>: {source}")]
    InvalidPattern {
        /// The pattern exactly as given on the command line.
        pattern: String,
        /// Compiler diagnostic from the regex crate.
        #[source]
        source: regex::Error,
    },
}

/// Failure evaluating a replacement template against a matching line.
///
/// Replacement templates are not validated when rules are compiled; they are
/// checked the first time they are actually evaluated. A failure only skips
/// the offending rule for that line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    /// The template references a capture group the pattern does not define.
    #[error("replacement references unknown group ${group}")]
    UnknownGroup {
        /// The group name or index as written in the template.
        group: String,
    },
}

/// Errors raised while starting the child process.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// No command was given.
    #[error("no command given: usage is `watchlog [--gsub RULESPEC] <command> [args...]`")]
    EmptyCommand,

    /// The OS refused to start the program.
    #[error("can't run {program}: {source}")]
    Start {
        /// Program name as given on the command line.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The child started but one of its output pipes was not available.
    #[error("can't get pipe: {stream} was not captured")]
    MissingPipe {
        /// Which stream was missing ("stdout" or "stderr").
        stream: &'static str,
    },
}

/// Errors that can occur while the viewer owns the terminal.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// IO error during terminal operations.
    #[error("Terminal IO error: {0}")]
    Io(#[from] std::io::Error),
}
