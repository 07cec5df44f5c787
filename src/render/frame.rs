//! A rendered frame and its physical extent.

use crate::core::text::width::visible_width;

/// The exact bytes of one frame, lines separated by `\n`.
///
/// A frame never ends with a newline: the cursor stays on its last line so the next redraw can
/// walk back up over it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Frame {
    text: String,
    hide_cursor: bool,
}

impl Frame {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hide_cursor: false,
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (idx, line) in lines.into_iter().enumerate() {
            if idx > 0 {
                text.push('\n');
            }
            text.push_str(line.as_ref());
        }
        Self::new(text)
    }

    /// Hide the terminal cursor while this frame is visible.
    pub fn with_hidden_cursor(mut self) -> Self {
        self.hide_cursor = true;
        self
    }

    pub fn hides_cursor(&self) -> bool {
        self.hide_cursor
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Physical rows the frame occupies at `columns` width.
    ///
    /// Each logical line takes `ceil(width / columns)` rows, at least one. A width of zero is
    /// treated as one column.
    pub fn extent(&self, columns: u16) -> usize {
        let columns = usize::from(columns.max(1));
        self.lines()
            .map(|line| rows_for_width(visible_width(line), columns))
            .sum()
    }
}

impl From<String> for Frame {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

pub(crate) fn rows_for_width(width: usize, columns: usize) -> usize {
    width.div_ceil(columns.max(1)).max(1)
}
