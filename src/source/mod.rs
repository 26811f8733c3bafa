//! Producers feeding the event loop.
//!
//! Every producer runs on its own thread and talks to the loop through its
//! own channel:
//! - one line reader per child stream ([`spawn_line_reader`])
//! - the child exit watcher ([`ChildProcess::spawn_exit_watcher`])
//! - the terminal input reader ([`spawn_keyboard_reader`])

pub mod child;
pub mod keyboard;
pub mod reader;

pub use child::{spawn_command, ChildExit, ChildPipes, ChildProcess};
pub use keyboard::{spawn_keyboard_reader, TerminalInput};
pub use reader::{forward_lines, spawn_line_reader, StreamLine};
