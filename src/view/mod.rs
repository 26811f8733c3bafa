//! TUI rendering and the event loop (impure shell)
//!
//! [`Viewer`] owns the line store and the terminal. Producers on other
//! threads talk to it only through channels, so every append and every
//! draw happens on the loop thread.

pub mod constants;
mod frame;
mod hotness;
mod styles;
pub mod terminal;
mod timestamp;

pub use frame::{render_frame, RenderFrame, RenderRow};
pub use hotness::HotnessBucket;
pub use styles::{ColorConfig, HotnessStyles};
pub use terminal::{restore_terminal, TerminalGuard};
pub use timestamp::format_age;

use crate::config::keybindings::KeyBindings;
use crate::integration;
use crate::model::{AppError, KeyAction, Source, ViewerError};
use crate::rules::RuleEngine;
use crate::source::{
    spawn_command, spawn_keyboard_reader, spawn_line_reader, ChildExit, ChildPipes, ChildProcess,
    StreamLine, TerminalInput,
};
use crate::state::LineStore;
use constants::VIEWER_EXIT_STATUS;
use crossbeam_channel::{bounded, never, select, tick, Receiver};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The user pressed a quit key.
    Quit,
    /// The child process exited; `None` if it died from a signal.
    ChildExited(Option<i32>),
}

impl StopReason {
    /// Process exit status for this stop.
    ///
    /// Always [`VIEWER_EXIT_STATUS`] unless `propagate` is set and the child
    /// ended the session with a code that fits in a byte.
    pub fn exit_status(self, propagate: bool) -> u8 {
        match self {
            StopReason::ChildExited(Some(code)) if propagate => {
                u8::try_from(code).unwrap_or(VIEWER_EXIT_STATUS)
            }
            _ => VIEWER_EXIT_STATUS,
        }
    }
}

/// One message received by the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    /// A raw line from one of the child's streams.
    Line(StreamLine),
    /// The redraw timer fired.
    Tick,
    /// A key press or resize.
    Input(TerminalInput),
    /// The child process ended.
    ChildExited(ChildExit),
    /// A stream reader finished; no more lines will come from it.
    StreamClosed(Source),
    /// The keyboard reader stopped.
    InputClosed,
}

/// Receiving ends of every producer.
#[derive(Debug)]
pub struct Producers {
    /// Lines from the child's stdout reader.
    pub stdout: Receiver<StreamLine>,
    /// Lines from the child's stderr reader.
    pub stderr: Receiver<StreamLine>,
    /// Key presses and resizes.
    pub input: Receiver<TerminalInput>,
    /// Single report from the exit watcher.
    pub child_exit: Receiver<ChildExit>,
    /// Redraw timer, usually `crossbeam_channel::tick`.
    pub tick: Receiver<Instant>,
}

/// Runtime options resolved from config and CLI.
#[derive(Debug, Clone, Copy)]
pub struct ViewerOptions {
    /// Redraw interval when nothing else happens.
    pub tick_interval: Duration,
    /// Whether lines are colored.
    pub colors: ColorConfig,
}

/// The log viewer.
///
/// Generic over backend to support testing with TestBackend
pub struct Viewer<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    store: LineStore,
    rules: RuleEngine,
    styles: HotnessStyles,
    key_bindings: KeyBindings,
}

impl<B> Viewer<B>
where
    B: Backend,
{
    /// Create a viewer with an empty line store and the default key bindings.
    pub fn new(terminal: Terminal<B>, rules: RuleEngine, styles: HotnessStyles) -> Self {
        Self {
            terminal,
            store: LineStore::new(),
            rules,
            styles,
            key_bindings: KeyBindings::default(),
        }
    }

    /// Run the event loop until the user quits or the child exits.
    ///
    /// Draws once up front so the screen is never left stale.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::Io` if drawing fails.
    pub fn run(&mut self, producers: Producers) -> Result<StopReason, ViewerError> {
        let Producers {
            mut stdout,
            mut stderr,
            mut input,
            child_exit,
            tick: ticker,
        } = producers;

        self.draw()?;

        loop {
            let event = select! {
                recv(stdout) -> msg => match msg {
                    Ok(line) => LoopEvent::Line(line),
                    Err(_) => LoopEvent::StreamClosed(Source::Out),
                },
                recv(stderr) -> msg => match msg {
                    Ok(line) => LoopEvent::Line(line),
                    Err(_) => LoopEvent::StreamClosed(Source::Err),
                },
                recv(ticker) -> _ => LoopEvent::Tick,
                recv(input) -> msg => match msg {
                    Ok(terminal_input) => LoopEvent::Input(terminal_input),
                    Err(_) => LoopEvent::InputClosed,
                },
                recv(child_exit) -> msg => {
                    // A watcher that hangs up without reporting has lost the child
                    LoopEvent::ChildExited(msg.unwrap_or(ChildExit { code: None }))
                },
            };

            // Disconnected receivers are always ready; swap them out of the set
            match &event {
                LoopEvent::StreamClosed(Source::Out) => stdout = never(),
                LoopEvent::StreamClosed(Source::Err) => stderr = never(),
                LoopEvent::InputClosed => input = never(),
                _ => {}
            }

            if let Some(reason) = self.handle_event(event)? {
                info!(?reason, lines = self.store.len(), "Viewer stopped");
                return Ok(reason);
            }
        }
    }

    /// Apply one event. Returns `Some` when the loop should stop.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::Io` if drawing fails.
    pub fn handle_event(&mut self, event: LoopEvent) -> Result<Option<StopReason>, ViewerError> {
        match event {
            LoopEvent::Line(line) => {
                self.ingest(line);
                self.draw()?;
            }
            LoopEvent::Tick => self.draw()?,
            LoopEvent::Input(TerminalInput::Key(key)) => match self.key_bindings.get(key) {
                Some(KeyAction::Quit) => return Ok(Some(StopReason::Quit)),
                Some(KeyAction::Redraw) => {
                    // Forces a full repaint on the next draw
                    self.terminal.clear()?;
                    self.draw()?;
                }
                None => {}
            },
            LoopEvent::Input(TerminalInput::Resize(width, height)) => {
                debug!("Handling resize to {}x{}", width, height);
                self.draw()?;
            }
            LoopEvent::ChildExited(exit) => return Ok(Some(StopReason::ChildExited(exit.code))),
            LoopEvent::StreamClosed(source) => debug!(%source, "Stream closed"),
            LoopEvent::InputClosed => {
                warn!("Keyboard input closed, only child exit can stop the viewer")
            }
        }

        Ok(None)
    }

    /// Rewrite and store a line stamped with the current instant.
    pub fn ingest(&mut self, line: StreamLine) {
        integration::ingest_line(&self.rules, &mut self.store, line);
    }

    /// Render the current frame as of now.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::Io` if the backend fails.
    pub fn draw(&mut self) -> Result<(), ViewerError> {
        self.draw_at(Instant::now())
    }

    /// Render the frame as it looks at `now`.
    ///
    /// The terminal size is re-read by ratatui on every draw.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::Io` if the backend fails.
    pub fn draw_at(&mut self, now: Instant) -> Result<(), ViewerError> {
        let store = &self.store;
        let styles = &self.styles;
        self.terminal.draw(|frame| render_frame(frame, store, now, styles))?;
        Ok(())
    }

    /// Lines received so far.
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// The underlying terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Store a line with an explicit arrival time.
    #[cfg(test)]
    pub(crate) fn ingest_at(&mut self, line: StreamLine, at: Instant) {
        integration::ingest_line_at(&self.rules, &mut self.store, line, at);
    }
}

/// Spawn `command` and view its output until the user quits or it exits.
///
/// The child is started before the terminal is taken over so that spawn
/// errors print on a normal screen. The terminal is restored on every path
/// out of this function. If the viewer stops for any reason other than the
/// child exiting, the child is killed.
///
/// # Errors
///
/// - `AppError::Spawn` if the command cannot be started
/// - `AppError::Viewer` if threads cannot be created or the terminal fails
pub fn run(
    command: &[String],
    rules: RuleEngine,
    options: ViewerOptions,
) -> Result<StopReason, AppError> {
    let (child, pipes) = spawn_command(command)?;

    let result = run_with_child(&child, pipes, rules, options);

    if !matches!(result, Ok(StopReason::ChildExited(_))) {
        child.terminate();
    }

    result
}

fn run_with_child(
    child: &ChildProcess,
    pipes: ChildPipes,
    rules: RuleEngine,
    options: ViewerOptions,
) -> Result<StopReason, AppError> {
    let (stdout_tx, stdout_rx) = bounded(0);
    let (stderr_tx, stderr_rx) = bounded(0);
    let (exit_tx, exit_rx) = bounded(0);
    let (input_tx, input_rx) = bounded(0);

    spawn_line_reader(pipes.stdout, Source::Out, stdout_tx).map_err(ViewerError::from)?;
    spawn_line_reader(pipes.stderr, Source::Err, stderr_tx).map_err(ViewerError::from)?;
    child.spawn_exit_watcher(exit_tx).map_err(ViewerError::from)?;

    let guard = TerminalGuard::enter().map_err(ViewerError::from)?;
    let terminal =
        Terminal::new(CrosstermBackend::new(io::stdout())).map_err(ViewerError::from)?;
    spawn_keyboard_reader(input_tx).map_err(ViewerError::from)?;

    info!(
        pid = child.id(),
        rules = rules.rules().len(),
        tick_ms = options.tick_interval.as_millis() as u64,
        "Viewer started"
    );

    let producers = Producers {
        stdout: stdout_rx,
        stderr: stderr_rx,
        input: input_rx,
        child_exit: exit_rx,
        tick: tick(options.tick_interval),
    };

    let styles = HotnessStyles::with_color_config(options.colors);
    let mut viewer = Viewer::new(terminal, rules, styles);
    let result = viewer.run(producers);

    guard.restore();

    Ok(result?)
}

#[cfg(test)]
#[path = "viewer_tests.rs"]
mod tests;
