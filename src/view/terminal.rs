//! Terminal takeover and restoration.
//!
//! Raw mode and the alternate screen are undone exactly once, whichever
//! comes first: [`TerminalGuard::restore`], the guard's `Drop`, or the
//! panic hook.

use crossterm::{
    cursor,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io;
use std::panic::{set_hook, take_hook};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use tracing::warn;

/// Set while the terminal is in raw mode on the alternate screen.
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK: Once = Once::new();

/// Keeps the terminal taken over until restored or dropped.
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from crossterm. Anything already switched on is
    /// switched back off before returning.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        TERMINAL_ACTIVE.store(true, Ordering::SeqCst);

        if let Err(err) = io::stdout().execute(EnterAlternateScreen) {
            restore_terminal();
            return Err(err);
        }

        Ok(Self { _private: () })
    }

    /// Restore the terminal now instead of at drop.
    pub fn restore(self) {
        restore_terminal();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Put the terminal back into cooked mode on the primary screen.
///
/// Only the first call after [`TerminalGuard::enter`] does anything.
pub fn restore_terminal() {
    if !TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
        return;
    }

    if let Err(err) = disable_raw_mode() {
        warn!(error = %err, "Failed to disable raw mode");
    }
    let mut stdout = io::stdout();
    if let Err(err) = stdout.execute(LeaveAlternateScreen) {
        warn!(error = %err, "Failed to leave alternate screen");
    }
    let _ = stdout.execute(cursor::Show);
}

/// Whether the terminal is currently taken over.
pub fn is_terminal_active() -> bool {
    TERMINAL_ACTIVE.load(Ordering::SeqCst)
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let original_hook = take_hook();
        set_hook(Box::new(move |panic_info| {
            // Restore first so the panic message lands on the normal screen
            restore_terminal();
            original_hook(panic_info);
        }));
    });
}
