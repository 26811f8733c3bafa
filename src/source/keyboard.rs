//! Terminal input producer.

use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::io;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Terminal input the event loop cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalInput {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized to (columns, rows).
    Resize(u16, u16),
}

impl TerminalInput {
    /// Keep key presses and resizes; drop everything else.
    ///
    /// Key release and repeat events (reported on some platforms) are
    /// ignored so one physical press yields one action.
    pub fn from_event(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(TerminalInput::Key(key)),
            Event::Resize(width, height) => Some(TerminalInput::Resize(width, height)),
            _ => None,
        }
    }
}

/// Start a thread that forwards terminal input into `tx`.
///
/// # Errors
///
/// Returns an I/O error if the OS refuses to create the thread.
pub fn spawn_keyboard_reader(tx: Sender<TerminalInput>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("keyboard".to_string())
        .spawn(move || loop {
            let event = match event::read() {
                Ok(event) => event,
                Err(err) => {
                    warn!(error = %err, "Terminal input failed, keyboard disabled");
                    return;
                }
            };

            let Some(input) = TerminalInput::from_event(event) else {
                continue;
            };
            if tx.send(input).is_err() {
                debug!("Event loop stopped listening for input");
                return;
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers, MouseEvent, MouseEventKind};

    #[test]
    fn key_press_is_forwarded() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(
            TerminalInput::from_event(Event::Key(key)),
            Some(TerminalInput::Key(key))
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let key = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(TerminalInput::from_event(Event::Key(key)), None);
    }

    #[test]
    fn resize_is_forwarded() {
        assert_eq!(
            TerminalInput::from_event(Event::Resize(120, 40)),
            Some(TerminalInput::Resize(120, 40))
        );
    }

    #[test]
    fn mouse_and_focus_are_ignored() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(TerminalInput::from_event(Event::Mouse(mouse)), None);
        assert_eq!(TerminalInput::from_event(Event::FocusGained), None);
    }
}
