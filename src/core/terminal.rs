//! Terminal trait and raw-mode lifecycle guard.

use std::io;

use crate::core::input::Key;
use crate::core::output::{OutputGate, TerminalCmd};

/// Minimal terminal interface the prompts and overlays drive.
pub trait Terminal {
    /// Switch stdin to raw mode (no echo, no line buffering, Ctrl-C delivered as a byte).
    fn enter_raw_mode(&mut self) -> io::Result<()>;

    /// Restore the mode captured by `enter_raw_mode`. A no-op when raw mode is not active.
    fn exit_raw_mode(&mut self) -> io::Result<()>;

    /// Block until one complete key sequence is available.
    fn read_key(&mut self) -> io::Result<Key>;

    /// Write output to the terminal.
    fn write(&mut self, data: &str) -> io::Result<()>;

    /// Terminal width in columns.
    fn columns(&self) -> u16;
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        (**self).enter_raw_mode()
    }

    fn exit_raw_mode(&mut self) -> io::Result<()> {
        (**self).exit_raw_mode()
    }

    fn read_key(&mut self) -> io::Result<Key> {
        (**self).read_key()
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        (**self).write(data)
    }

    fn columns(&self) -> u16 {
        (**self).columns()
    }
}

/// RAII guard that holds the terminal in raw mode.
///
/// On drop (normal return, early `?` return, or unwinding) the cursor is made visible again and
/// the original terminal mode is restored.
pub struct RawModeGuard<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
}

impl<'a, T: Terminal + ?Sized> RawModeGuard<'a, T> {
    pub fn enter(terminal: &'a mut T) -> io::Result<Self> {
        terminal.enter_raw_mode()?;
        Ok(Self { terminal })
    }

    /// Access the wrapped terminal.
    pub fn terminal_mut(&mut self) -> &mut T {
        self.terminal
    }
}

impl<T: Terminal + ?Sized> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        let mut gate = OutputGate::new();
        gate.push(TerminalCmd::ShowCursor);
        let _ = gate.flush(&mut *self.terminal);
        let _ = self.terminal.exit_raw_mode();
    }
}
