//! Per-draw frame computation and painting.
//!
//! [`RenderFrame`] is the pure half: it picks the tail window, pads it to the
//! terminal height, classifies each line and formats its prefix.
//! [`render_frame`] is the impure half that paints it onto a ratatui frame.

use super::hotness::HotnessBucket;
use super::styles::HotnessStyles;
use super::timestamp::format_age;
use crate::model::Source;
use crate::state::LineStore;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use std::time::Instant;
use unicode_width::UnicodeWidthChar;

/// Tab stops every eight columns.
const TAB_WIDTH: usize = 8;

/// One visible, non-padding row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    /// Relative timestamp, e.g. `[+  3.10s] `, clipped to the width.
    pub prefix: String,
    /// Display-safe line text, clipped to what fits after the prefix.
    pub text: String,
    /// Recency class of the line.
    pub bucket: HotnessBucket,
    /// Stream the line came from.
    pub source: Source,
}

/// The tail window of the store as it should appear right now.
///
/// Always holds exactly `height` rows; leading `None`s are blank padding
/// so that output is anchored to the bottom of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    rows: Vec<Option<RenderRow>>,
}

impl RenderFrame {
    /// Compute the frame for a `width` x `height` surface at `now`.
    pub fn compute(store: &LineStore, now: Instant, width: u16, height: u16) -> Self {
        let width = usize::from(width);
        let visible = store.tail(usize::from(height));
        let padding = usize::from(height) - visible.len();

        let mut rows: Vec<Option<RenderRow>> = Vec::with_capacity(usize::from(height));
        rows.resize(padding, None);

        rows.extend(visible.iter().map(|line| {
            let age = now.saturating_duration_since(line.timestamp());
            let (prefix, prefix_cols) = clip_to_width(&format_age(age), width);
            let (text, _) = clip_to_width(
                &sanitize_for_display(line.text()),
                width.saturating_sub(prefix_cols),
            );

            Some(RenderRow {
                prefix,
                text,
                bucket: HotnessBucket::for_age(age),
                source: line.source(),
            })
        }));

        Self { rows }
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> &[Option<RenderRow>] {
        &self.rows
    }

    /// Number of blank rows above the first line.
    pub fn padding(&self) -> usize {
        self.rows.iter().take_while(|row| row.is_none()).count()
    }
}

/// Clear the surface and draw the current tail window.
pub fn render_frame(frame: &mut Frame, store: &LineStore, now: Instant, styles: &HotnessStyles) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    let computed = RenderFrame::compute(store, now, area.width, area.height);
    for (offset, row) in computed.rows().iter().enumerate() {
        let Some(row) = row else {
            continue;
        };

        // rows.len() == area.height, so the offset always fits in u16
        let row_area = Rect::new(area.x, area.y + offset as u16, area.width, 1);
        let line = Line::from(vec![
            Span::styled(row.prefix.as_str(), styles.prefix()),
            Span::styled(row.text.as_str(), styles.for_bucket(row.bucket)),
        ]);
        frame.render_widget(Paragraph::new(line), row_area);
    }
}

/// Take the longest prefix of `text` that fits in `max_cols` terminal columns.
///
/// Returns the clipped string and the number of columns it occupies.
fn clip_to_width(text: &str, max_cols: usize) -> (String, usize) {
    let mut cols = 0;
    let mut clipped = String::new();

    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if cols + w > max_cols {
            break;
        }
        cols += w;
        clipped.push(ch);
    }

    (clipped, cols)
}

/// Make child output safe to place into terminal cells.
///
/// Tabs expand to the next tab stop, ANSI escape sequences are dropped and
/// any other control character is removed.
fn sanitize_for_display(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cols = 0;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\t' => {
                let pad = TAB_WIDTH - cols % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(pad));
                cols += pad;
            }
            '\u{1b}' => match chars.next() {
                // CSI: parameters and intermediates, then one final byte
                Some('[') => {
                    for c in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&c) {
                            break;
                        }
                    }
                }
                // OSC: terminated by BEL or ST (ESC \)
                Some(']') => {
                    while let Some(c) = chars.next() {
                        if c == '\u{7}' {
                            break;
                        }
                        if c == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            c if c.is_control() => {}
            c => {
                cols += c.width().unwrap_or(0);
                out.push(c);
            }
        }
    }

    out
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
