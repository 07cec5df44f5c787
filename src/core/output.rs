//! Typed terminal output commands and a single output gate.
//!
//! Invariant: all terminal writes must flow through `OutputGate::flush(..)`.

use std::io;

use crate::core::terminal::Terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Raw bytes/control sequences (UTF-8 string) to be written to the terminal.
    Bytes(String),
    /// Static raw bytes/control sequences (UTF-8 string) to be written to the terminal.
    BytesStatic(&'static str),

    /// Cursor visibility.
    HideCursor,
    ShowCursor,

    /// Protocol toggles.
    BracketedPasteEnable,
    BracketedPasteDisable,

    /// Return to column 0 and erase the whole line.
    ClearLine,
    /// Move the cursor up this many rows (zero is a no-op).
    CursorUp(usize),
}

impl TerminalCmd {
    pub fn bytes(data: impl Into<String>) -> Self {
        Self::Bytes(data.into())
    }

    fn encode_into(&self, out: &mut String) {
        match self {
            TerminalCmd::Bytes(data) => out.push_str(data),
            TerminalCmd::BytesStatic(data) => out.push_str(data),
            TerminalCmd::HideCursor => out.push_str("\x1b[?25l"),
            TerminalCmd::ShowCursor => out.push_str("\x1b[?25h"),
            TerminalCmd::BracketedPasteEnable => out.push_str("\x1b[?2004h"),
            TerminalCmd::BracketedPasteDisable => out.push_str("\x1b[?2004l"),
            TerminalCmd::ClearLine => out.push_str("\r\x1b[2K"),
            TerminalCmd::CursorUp(0) => {}
            TerminalCmd::CursorUp(rows) => out.push_str(&format!("\x1b[{rows}A")),
        }
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Flush buffered commands to the terminal as a single write.
    ///
    /// This is the single write gate: `Terminal::write(..)` must not be called
    /// from anywhere else.
    pub fn flush<T: Terminal + ?Sized>(&mut self, term: &mut T) -> io::Result<()> {
        if self.cmds.is_empty() {
            return Ok(());
        }
        let mut out = String::new();
        for cmd in self.cmds.drain(..) {
            cmd.encode_into(&mut out);
        }
        if out.is_empty() {
            return Ok(());
        }
        term.write(&out)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{OutputGate, TerminalCmd};
    use crate::core::input::Key;
    use crate::core::terminal::Terminal;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<String>,
    }

    impl Terminal for Recorder {
        fn enter_raw_mode(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn exit_raw_mode(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn read_key(&mut self) -> io::Result<Key> {
            Err(io::ErrorKind::UnexpectedEof.into())
        }

        fn write(&mut self, data: &str) -> io::Result<()> {
            self.writes.push(data.to_string());
            Ok(())
        }

        fn columns(&self) -> u16 {
            80
        }
    }

    #[test]
    fn flush_coalesces_commands_into_one_write() {
        let mut term = Recorder::default();
        let mut gate = OutputGate::new();
        gate.extend([
            TerminalCmd::ClearLine,
            TerminalCmd::CursorUp(1),
            TerminalCmd::ClearLine,
            TerminalCmd::bytes("frame"),
            TerminalCmd::HideCursor,
        ]);
        gate.flush(&mut term).expect("flush");

        assert_eq!(term.writes, vec!["\r\x1b[2K\x1b[1A\r\x1b[2Kframe\x1b[?25l"]);
        assert!(gate.is_empty());
    }

    #[test]
    fn empty_flush_writes_nothing() {
        let mut term = Recorder::default();
        let mut gate = OutputGate::new();
        gate.push(TerminalCmd::CursorUp(0));
        gate.flush(&mut term).expect("flush");
        gate.flush(&mut term).expect("flush");
        assert!(term.writes.is_empty());
    }
}
