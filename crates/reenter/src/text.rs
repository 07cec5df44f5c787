//! Plain text output between prompts.

use std::io;

use reenter_tui::{visible_width, OutputGate, Terminal, TerminalCmd};

/// Left margin for every block of prose.
pub const MARGIN: &str = "  ";

/// Indent each line by [`MARGIN`], word-wrapping lines that do not fit in `columns`.
///
/// A single word wider than the available room gets a row of its own and is not broken.
pub fn with_margin(text: &str, columns: u16) -> String {
    let available = (columns as usize).saturating_sub(MARGIN.len()).max(1);

    text.split('\n')
        .map(|line| {
            if visible_width(line) <= available {
                return format!("{MARGIN}{line}");
            }

            let mut rows = Vec::new();
            let mut current = String::new();
            for word in line.split(' ') {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if visible_width(&candidate) <= available {
                    current = candidate;
                } else if current.is_empty() {
                    rows.push(format!("{MARGIN}{word}"));
                } else {
                    rows.push(format!("{MARGIN}{current}"));
                    current = word.to_string();
                }
            }
            if !current.is_empty() {
                rows.push(format!("{MARGIN}{current}"));
            }
            rows.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A margined block with one blank line before and after.
pub fn text_block(text: &str, columns: u16) -> String {
    format!("\n{}\n\n", with_margin(text, columns))
}

/// Write `text` as-is.
pub fn write_text<T: Terminal + ?Sized>(term: &mut T, text: &str) -> io::Result<()> {
    let mut gate = OutputGate::new();
    gate.push(TerminalCmd::bytes(text));
    gate.flush(term)
}

/// Write `text` as a margined block sized to the terminal.
pub fn write_block<T: Terminal + ?Sized>(term: &mut T, text: &str) -> io::Result<()> {
    let block = text_block(text, term.columns());
    write_text(term, &block)
}
