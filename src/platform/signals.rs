//! SIGINT/SIGTERM cleanup.
//!
//! Prompts read Ctrl-C as a key, but while an overlay is running the terminal is cooked and the
//! signal is delivered to the process. The hook installed here gets one chance to put the screen
//! back before the process exits.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use signal_hook::iterator::{Handle, Signals};

use crate::core::input::Key;
use crate::core::terminal::Terminal;
use crate::platform::process_terminal::{TtyFd, FALLBACK_COLUMNS};

/// Keeps the signal thread alive. Dropping it unregisters the hook and joins the thread.
pub struct SignalHookGuard {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl Drop for SignalHookGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Run `cleanup` on the first SIGINT or SIGTERM. Later signals are logged and ignored.
pub fn install_signal_handlers<F>(cleanup: F) -> io::Result<SignalHookGuard>
where
    F: Fn() + Send + Sync + 'static,
{
    let mut signals = Signals::new([libc::SIGINT, libc::SIGTERM])?;
    let handle = signals.handle();
    let fired = AtomicBool::new(false);

    let thread = thread::Builder::new()
        .name("reenter-signals".into())
        .spawn(move || {
            for signal in signals.forever() {
                tracing::debug!(signal, "termination signal");
                if !fired.swap(true, Ordering::SeqCst) {
                    cleanup();
                }
            }
        })?;

    Ok(SignalHookGuard {
        handle,
        thread: Some(thread),
    })
}

/// Write-only terminal on the controlling tty, for use inside a signal hook.
///
/// Opened non-blocking so a stuck tty can never hang cleanup. If there is no controlling tty
/// every write is silently dropped.
pub struct HookTerminal {
    tty: Option<TtyFd>,
}

impl HookTerminal {
    pub fn new() -> Self {
        let flags = libc::O_WRONLY | libc::O_NONBLOCK | libc::O_NOCTTY | libc::O_CLOEXEC;
        let fd = unsafe { libc::open(c"/dev/tty".as_ptr(), flags) };
        Self {
            tty: (fd >= 0).then_some(TtyFd(fd)),
        }
    }
}

impl Default for HookTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HookTerminal {
    fn drop(&mut self) {
        if let Some(tty) = self.tty.take() {
            unsafe {
                libc::close(tty.0);
            }
        }
    }
}

impl Terminal for HookTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "the signal hook terminal is write-only",
        ))
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        if let Some(tty) = self.tty {
            tty.write_lossy(data.as_bytes());
        }
        Ok(())
    }

    fn columns(&self) -> u16 {
        FALLBACK_COLUMNS
    }
}
