//! Line-buffered reader shared by both child streams.

use crate::model::Source;
use crossbeam_channel::Sender;
use std::io::{self, BufRead, BufReader, Read};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// A decoded line handed from a reader to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamLine {
    /// Stream the line was read from.
    pub source: Source,
    /// Raw line text, line terminator removed, not yet substituted.
    pub text: String,
}

/// Start a thread that forwards every line of `reader` into `tx`.
///
/// The same function serves stdout and stderr; `source` tags each line.
///
/// # Errors
///
/// Returns an I/O error if the OS refuses to create the thread.
pub fn spawn_line_reader<R>(
    reader: R,
    source: Source,
    tx: Sender<StreamLine>,
) -> io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name(format!("{}-reader", source.label()))
        .spawn(move || forward_lines(reader, source, &tx))
}

/// Read `reader` to the end, sending one [`StreamLine`] per line.
///
/// A final fragment without a trailing newline is still sent. Invalid UTF-8
/// is replaced rather than dropped. Returns when the stream ends, a read
/// fails, or the receiving side hangs up.
pub fn forward_lines<R: Read>(reader: R, source: Source, tx: &Sender<StreamLine>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                debug!(%source, "Stream reached end of file");
                return;
            }
            Ok(_) => {
                let line = StreamLine {
                    source,
                    text: decode_line(&buf),
                };
                if tx.send(line).is_err() {
                    debug!(%source, "Event loop stopped listening");
                    return;
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                warn!(%source, error = %err, "Stream read failed, closing stream");
                return;
            }
        }
    }
}

/// Strip the line terminator (`\n` or `\r\n`) and decode lossily.
fn decode_line(raw: &[u8]) -> String {
    let trimmed = raw.strip_suffix(b"\n").unwrap_or(raw);
    let trimmed = trimmed.strip_suffix(b"\r").unwrap_or(trimmed);
    String::from_utf8_lossy(trimmed).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn collect(data: &[u8]) -> Vec<String> {
        let (tx, rx) = unbounded();
        forward_lines(data, Source::Out, &tx);
        drop(tx);
        rx.iter().map(|line| line.text).collect()
    }

    #[test]
    fn splits_on_newlines() {
        assert_eq!(collect(b"line1\nline2\nline3\n"), vec!["line1", "line2", "line3"]);
    }

    #[test]
    fn partial_final_line_is_emitted() {
        assert_eq!(collect(b"done\npartial"), vec!["done", "partial"]);
    }

    #[test]
    fn empty_input_sends_nothing() {
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(collect(b"a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        assert_eq!(collect(b"windows\r\nstyle\r\n"), vec!["windows", "style"]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let lines = collect(b"ok \xff here\n");
        assert_eq!(lines, vec!["ok \u{fffd} here"]);
    }

    #[test]
    fn lines_carry_the_source_tag() {
        let (tx, rx) = unbounded();
        forward_lines(&b"oops\n"[..], Source::Err, &tx);

        assert_eq!(
            rx.try_recv().unwrap(),
            StreamLine {
                source: Source::Err,
                text: "oops".to_string()
            }
        );
    }

    #[test]
    fn stops_when_receiver_is_dropped() {
        let (tx, rx) = unbounded();
        drop(rx);

        // Must return instead of looping forever on a closed channel
        forward_lines(&b"a\nb\nc\n"[..], Source::Out, &tx);
    }

    #[test]
    fn spawned_reader_delivers_over_rendezvous_channel() {
        let (tx, rx) = crossbeam_channel::bounded(0);
        let handle = spawn_line_reader(&b"one\ntwo"[..], Source::Out, tx).unwrap();

        let texts: Vec<String> = rx.iter().map(|line| line.text).collect();
        handle.join().unwrap();

        assert_eq!(texts, vec!["one", "two"]);
    }
}
