//! Captured output line and its origin stream.

use std::fmt;
use std::time::Instant;

/// Which child stream a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Standard output of the child process.
    Out,
    /// Standard error of the child process.
    Err,
}

impl Source {
    /// Short lowercase label used in log records.
    pub fn label(self) -> &'static str {
        match self {
            Source::Out => "stdout",
            Source::Err => "stderr",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of child output, as stored after substitution.
///
/// Created once at arrival and never mutated. Fields are private so a
/// `LogLine` can only come out of the [`LineStore`](crate::state::LineStore),
/// which owns the timestamp ordering invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    timestamp: Instant,
    source: Source,
    text: String,
}

impl LogLine {
    pub(crate) fn new(timestamp: Instant, source: Source, text: String) -> Self {
        Self {
            timestamp,
            source,
            text,
        }
    }

    /// Instant the line arrived at the event loop.
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Stream the line came from.
    pub fn source(&self) -> Source {
        self.source
    }

    /// Post-substitution text, without the line terminator.
    pub fn text(&self) -> &str {
        &self.text
    }
}
