//! Domain-level keyboard actions independent of key bindings.

/// Actions the viewer understands at runtime.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by
/// [`KeyBindings`](crate::config::KeyBindings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Stop the viewer. Default: q / Ctrl+C
    Quit,
    /// Repaint the screen without ingesting anything. Default: Ctrl+L
    Redraw,
}
