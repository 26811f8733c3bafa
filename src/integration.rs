//! Pure core integration functions.
//!
//! Glue between the producers and the line store: a raw line read from the
//! child is rewritten by the rule engine and appended with its arrival time.
//! Testable without any threads or terminal.

use crate::model::LogLine;
use crate::rules::RuleEngine;
use crate::source::StreamLine;
use crate::state::LineStore;
use std::time::Instant;

/// Rewrite `line` and append it to `store`, stamped with the current instant.
pub fn ingest_line<'a>(
    rules: &RuleEngine,
    store: &'a mut LineStore,
    line: StreamLine,
) -> &'a LogLine {
    ingest_line_at(rules, store, line, Instant::now())
}

/// Same as [`ingest_line`] with an explicit arrival time.
pub fn ingest_line_at<'a>(
    rules: &RuleEngine,
    store: &'a mut LineStore,
    line: StreamLine,
    at: Instant,
) -> &'a LogLine {
    let text = rules.apply(&line.text, line.source);
    store.append_at(line.source, text, at)
}
