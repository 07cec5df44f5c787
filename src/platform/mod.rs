//! Platform-specific terminal integrations.

pub mod process_terminal;
#[cfg(unix)]
pub mod signals;
#[cfg(unix)]
pub mod stdin_buffer;

pub use process_terminal::ProcessTerminal;
#[cfg(unix)]
pub use process_terminal::restore_saved_termios;
#[cfg(unix)]
pub use signals::{install_signal_handlers, HookTerminal, SignalHookGuard};
