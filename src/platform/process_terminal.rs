//! Terminal backed by the process's own stdin and stdout.

#[cfg(unix)]
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
#[cfg(unix)]
use std::sync::{Mutex, MutexGuard};
#[cfg(unix)]
use std::time::Instant;

use crate::config::EnvConfig;
#[cfg(unix)]
use crate::core::input::parse_key;
use crate::core::input::Key;
use crate::core::terminal::Terminal;
#[cfg(unix)]
use crate::platform::stdin_buffer::{StdinBuffer, StdinEvent};

#[cfg(unix)]
use libc::c_int;

/// Incomplete escape tails are held this long before being delivered as typed.
const ESCAPE_HOLD_MS: u64 = 10;

pub(crate) const FALLBACK_COLUMNS: u16 = 80;

/// Mode captured by the latest unexited `enter_raw_mode`, for signal-time restoration.
#[cfg(unix)]
static RAW_MODE_ORIGIN: Mutex<Option<(c_int, libc::termios)>> = Mutex::new(None);

#[cfg(unix)]
fn raw_mode_origin() -> MutexGuard<'static, Option<(c_int, libc::termios)>> {
    RAW_MODE_ORIGIN
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Put the terminal mode back to what the last unexited `enter_raw_mode` found.
///
/// Used from signal cleanup, where the owning `ProcessTerminal` is out of reach.
#[cfg(unix)]
pub fn restore_saved_termios() {
    if let Some((fd, termios)) = raw_mode_origin().take() {
        let _ = TtyFd(fd).set_termios(&termios);
    }
}

#[cfg(unix)]
fn os_result(code: c_int) -> io::Result<c_int> {
    if code < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(code)
    }
}

/// Feed `bytes` through `write_once` until all are accepted.
///
/// EINTR retries at once; EAGAIN waits on `block` first. A zero-length write is an error.
#[cfg(unix)]
pub(crate) fn drain_writes(
    bytes: &[u8],
    mut write_once: impl FnMut(&[u8]) -> io::Result<usize>,
    mut block: impl FnMut() -> io::Result<()>,
) -> io::Result<()> {
    let mut rest = bytes;
    while !rest.is_empty() {
        match write_once(rest) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) if n > rest.len() => {
                return Err(io::Error::other("write reported more bytes than given"))
            }
            Ok(n) => rest = &rest[n..],
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => block()?,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// A borrowed terminal file descriptor. Never closes what it wraps.
#[cfg(unix)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TtyFd(pub(crate) c_int);

#[cfg(unix)]
impl TtyFd {
    pub(crate) const STDIN: Self = Self(libc::STDIN_FILENO);
    pub(crate) const STDOUT: Self = Self(libc::STDOUT_FILENO);

    fn write_once(self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe { libc::write(self.0, buf.as_ptr().cast(), buf.len()) };
        if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }

    pub(crate) fn write_all(self, data: &[u8]) -> io::Result<()> {
        drain_writes(data, |buf| self.write_once(buf), || self.wait(libc::POLLOUT, -1).map(drop))
    }

    /// Best-effort write for cleanup paths: stops at the first hard error or would-block.
    pub(crate) fn write_lossy(self, data: &[u8]) {
        let _ = drain_writes(data, |buf| self.write_once(buf), || {
            Err(io::ErrorKind::WouldBlock.into())
        });
    }

    pub(crate) fn read(self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = unsafe { libc::read(self.0, buf.as_mut_ptr().cast(), buf.len()) };
            if n >= 0 {
                return Ok(n as usize);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    /// Poll for `events`. `Ok(false)` on timeout or EINTR; a negative timeout waits forever.
    pub(crate) fn wait(self, events: libc::c_short, timeout_ms: i32) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.0,
            events,
            revents: 0,
        };
        let ready = match os_result(unsafe { libc::poll(&mut pfd, 1, timeout_ms) }) {
            Ok(ready) => ready,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => return Ok(false),
            Err(err) => return Err(err),
        };
        if pfd.revents & libc::POLLNVAL != 0 {
            return Err(io::Error::from_raw_os_error(libc::EBADF));
        }
        Ok(ready > 0 && pfd.revents & (events | libc::POLLHUP | libc::POLLERR) != 0)
    }

    pub(crate) fn columns(self) -> Option<u16> {
        let mut size: libc::winsize = unsafe { std::mem::zeroed() };
        let ok = unsafe { libc::ioctl(self.0, libc::TIOCGWINSZ, &mut size) } == 0;
        (ok && size.ws_col > 0).then_some(size.ws_col)
    }

    pub(crate) fn termios(self) -> io::Result<libc::termios> {
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        os_result(unsafe { libc::tcgetattr(self.0, &mut termios) })?;
        Ok(termios)
    }

    pub(crate) fn set_termios(self, termios: &libc::termios) -> io::Result<()> {
        os_result(unsafe { libc::tcsetattr(self.0, libc::TCSANOW, termios) }).map(drop)
    }

    fn discard_input(self) {
        unsafe {
            libc::tcflush(self.0, libc::TCIFLUSH);
        }
    }
}

/// Appends every frame written to the terminal to a file, for debugging redraws.
///
/// The first failure disables it for the rest of the run.
#[derive(Debug, Default)]
struct WriteLog {
    path: Option<PathBuf>,
}

impl WriteLog {
    fn new(config: &EnvConfig) -> Self {
        Self {
            path: config.write_log.as_ref().map(PathBuf::from),
        }
    }

    fn append(&mut self, data: &str) {
        let Some(path) = self.path.as_ref() else {
            return;
        };
        let appended = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(data.as_bytes()));
        if let Err(err) = appended {
            tracing::warn!(path = %path.display(), error = %err, "terminal write log disabled");
            self.path = None;
        }
    }
}

/// Terminal over the process's stdin and stdout.
#[cfg(unix)]
pub struct ProcessTerminal {
    input: TtyFd,
    output: TtyFd,
    cooked: Option<libc::termios>,
    stdin: StdinBuffer,
    keys: VecDeque<Key>,
    write_log: WriteLog,
}

#[cfg(unix)]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self::with_config(&EnvConfig::from_env())
    }

    pub fn with_config(config: &EnvConfig) -> Self {
        Self {
            input: TtyFd::STDIN,
            output: TtyFd::STDOUT,
            cooked: None,
            stdin: StdinBuffer::new(ESCAPE_HOLD_MS),
            keys: VecDeque::new(),
            write_log: WriteLog::new(config),
        }
    }

    fn enqueue(&mut self, events: Vec<StdinEvent>) {
        self.keys.extend(events.into_iter().map(|event| match event {
            StdinEvent::Data(sequence) => parse_key(&sequence),
            StdinEvent::Paste(text) => Key::Paste(text),
        }));
    }

    fn fill(&mut self) -> io::Result<()> {
        let timeout = self.stdin.next_timeout_ms(Instant::now()).unwrap_or(-1);
        if !self.input.wait(libc::POLLIN, timeout)? {
            let held = self.stdin.flush_due(Instant::now());
            self.enqueue(held);
            return Ok(());
        }

        let mut chunk = [0u8; 4096];
        let len = self.input.read(&mut chunk)?;
        if len == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while waiting for a key",
            ));
        }
        let events = self.stdin.process(&chunk[..len], Instant::now());
        self.enqueue(events);
        Ok(())
    }
}

#[cfg(unix)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl Terminal for ProcessTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        let cooked = match self.cooked {
            Some(cooked) => cooked,
            None => self.input.termios()?,
        };
        let mut raw = cooked;
        unsafe { libc::cfmakeraw(&mut raw) };
        self.input.set_termios(&raw)?;

        self.cooked = Some(cooked);
        *raw_mode_origin() = Some((self.input.0, cooked));
        tracing::debug!(fd = self.input.0, "raw mode on");
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> io::Result<()> {
        let Some(cooked) = self.cooked.take() else {
            return Ok(());
        };

        // Unread bytes would otherwise reach the shell after exit.
        self.input.discard_input();
        self.stdin.clear();
        self.keys.clear();
        raw_mode_origin().take();

        self.input.set_termios(&cooked)?;
        tracing::debug!(fd = self.input.0, "raw mode off");
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            if let Some(key) = self.keys.pop_front() {
                return Ok(key);
            }
            self.fill()?;
        }
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        self.output.write_all(data.as_bytes())?;
        self.write_log.append(data);
        Ok(())
    }

    fn columns(&self) -> u16 {
        self.output.columns().unwrap_or(FALLBACK_COLUMNS)
    }
}

/// Write-only stand-in on platforms without termios: prompts fail, plain output still works.
#[cfg(not(unix))]
pub struct ProcessTerminal {
    write_log: WriteLog,
}

#[cfg(not(unix))]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self::with_config(&EnvConfig::from_env())
    }

    pub fn with_config(config: &EnvConfig) -> Self {
        Self {
            write_log: WriteLog::new(config),
        }
    }
}

#[cfg(not(unix))]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(unix))]
fn no_raw_mode() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "interactive prompts need a Unix terminal",
    )
}

#[cfg(not(unix))]
impl Terminal for ProcessTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        Err(no_raw_mode())
    }

    fn exit_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        Err(no_raw_mode())
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data.as_bytes())?;
        stdout.flush()?;
        self.write_log.append(data);
        Ok(())
    }

    fn columns(&self) -> u16 {
        FALLBACK_COLUMNS
    }
}
