//! Append-only store of captured lines.

use crate::model::{LogLine, Source};
use std::time::Instant;

/// Ordered, append-only sequence of [`LogLine`]s.
///
/// Insertion order is arrival order and timestamps never decrease along
/// the sequence. There is no removal: the viewer is meant for debugging
/// sessions, and memory grows with the amount of output captured.
#[derive(Debug, Default)]
pub struct LineStore {
    lines: Vec<LogLine>,
}

impl LineStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a line stamped with the current instant.
    pub fn append(&mut self, source: Source, text: impl Into<String>) -> &LogLine {
        self.append_at(source, text, Instant::now())
    }

    /// Store a line stamped with `at`.
    ///
    /// An instant earlier than the newest stored timestamp is raised to it,
    /// so the ordering invariant survives callers with skewed clocks.
    pub fn append_at(&mut self, source: Source, text: impl Into<String>, at: Instant) -> &LogLine {
        let timestamp = match self.lines.last() {
            Some(last) if last.timestamp() > at => last.timestamp(),
            _ => at,
        };

        self.lines.push(LogLine::new(timestamp, source, text.into()));
        &self.lines[self.lines.len() - 1]
    }

    /// The last `min(n, len)` lines, oldest first.
    pub fn tail(&self, n: usize) -> &[LogLine] {
        let start = self.lines.len().saturating_sub(n);
        &self.lines[start..]
    }

    /// Most recently stored line.
    pub fn last(&self) -> Option<&LogLine> {
        self.lines.last()
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }
}

#[cfg(test)]
#[path = "line_store_tests.rs"]
mod tests;
