//! In-place frame replacement.
//!
//! Invariant: after any number of `redraw` calls exactly one frame is visible, and nothing above
//! the first frame's starting row is ever touched.

use std::io;

use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::terminal::Terminal;
use crate::logging::debug_redraw_enabled;
use crate::render::frame::Frame;

/// Tracks how many physical rows the visible frame occupies and replaces it on demand.
#[derive(Debug, Default)]
pub struct RedrawController {
    previous_extent: usize,
    redraws: usize,
    debug_redraw: bool,
}

impl RedrawController {
    /// Controller with nothing on screen yet; redraw logging follows `REENTER_DEBUG_REDRAW`.
    pub fn new() -> Self {
        Self {
            debug_redraw: debug_redraw_enabled(),
            ..Self::default()
        }
    }

    /// Log every redraw at debug level.
    pub fn with_debug_redraw(mut self, enabled: bool) -> Self {
        self.debug_redraw = enabled;
        self
    }

    /// Rows occupied by the frame currently on screen (zero when nothing is drawn).
    pub fn previous_extent(&self) -> usize {
        self.previous_extent
    }

    /// Number of frames written so far.
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Replace the visible frame with `frame`.
    pub fn redraw<T: Terminal + ?Sized>(&mut self, term: &mut T, frame: &Frame) -> io::Result<()> {
        let columns = term.columns();
        let mut gate = OutputGate::new();
        self.push_clear(&mut gate);
        gate.push(TerminalCmd::Bytes(to_wire(frame.as_str())));
        if frame.hides_cursor() {
            gate.push(TerminalCmd::HideCursor);
        }
        gate.flush(term)?;

        let extent = frame.extent(columns);
        if self.debug_redraw {
            tracing::debug!(
                cleared = self.previous_extent,
                written = extent,
                columns,
                "redraw"
            );
        }
        self.previous_extent = extent;
        self.redraws += 1;
        Ok(())
    }

    /// Replace the visible frame with a one-line summary and move below it.
    ///
    /// Later output starts on a fresh line and the summary is never cleared again.
    pub fn finish<T: Terminal + ?Sized>(&mut self, term: &mut T, summary: &str) -> io::Result<()> {
        let mut gate = OutputGate::new();
        self.push_clear(&mut gate);
        gate.push(TerminalCmd::Bytes(to_wire(summary)));
        gate.push(TerminalCmd::BytesStatic("\r\n"));
        gate.flush(term)?;

        if self.debug_redraw {
            tracing::debug!(cleared = self.previous_extent, "finish");
        }
        self.previous_extent = 0;
        Ok(())
    }

    /// Erase the visible frame and leave the cursor on a blank line below where it started.
    pub fn abandon<T: Terminal + ?Sized>(&mut self, term: &mut T) -> io::Result<()> {
        let mut gate = OutputGate::new();
        self.push_clear(&mut gate);
        gate.push(TerminalCmd::BytesStatic("\r\n"));
        gate.flush(term)?;

        if self.debug_redraw {
            tracing::debug!(cleared = self.previous_extent, "abandon");
        }
        self.previous_extent = 0;
        Ok(())
    }

    /// Clear every row of the previous frame bottom-up, ending at its first row, column 0.
    fn push_clear(&self, gate: &mut OutputGate) {
        if self.previous_extent == 0 {
            return;
        }
        for row in 0..self.previous_extent {
            gate.push(TerminalCmd::ClearLine);
            if row + 1 < self.previous_extent {
                gate.push(TerminalCmd::CursorUp(1));
            }
        }
    }
}

/// Raw mode disables output post-processing, so every line break carries its own `\r`.
fn to_wire(text: &str) -> String {
    text.replace('\n', "\r\n")
}
