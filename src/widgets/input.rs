//! Free-text input prompt.

use unicode_segmentation::UnicodeSegmentation;

use crate::core::input::Key;
use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::style::{bold, bright_blue, cyan, dim, done_bullet, BULLET, POINTER};
use crate::core::terminal::{RawModeGuard, Terminal};
use crate::error::PromptError;
use crate::render::{Frame, RedrawController};
use crate::widgets::{KeyOutcome, PromptStatus};

/// Accumulating buffer edited only at its end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    buffer: String,
    status: PromptStatus,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer exactly as typed.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The submitted answer: the buffer with surrounding whitespace removed.
    pub fn value(&self) -> &str {
        self.buffer.trim()
    }

    pub fn status(&self) -> PromptStatus {
        self.status
    }

    /// Apply one key. Once `Done`, every key is ignored.
    pub fn handle_key(&mut self, key: &Key) -> KeyOutcome {
        if self.status == PromptStatus::Done {
            return KeyOutcome::Ignored;
        }
        match key {
            Key::Char(ch) => {
                self.buffer.push(*ch);
                KeyOutcome::Changed
            }
            Key::Paste(text) => {
                let cleaned: String = text.chars().filter(|ch| !ch.is_control()).collect();
                if cleaned.is_empty() {
                    return KeyOutcome::Ignored;
                }
                self.buffer.push_str(&cleaned);
                KeyOutcome::Changed
            }
            Key::Backspace => match self.buffer.grapheme_indices(true).next_back() {
                Some((idx, _)) => {
                    self.buffer.truncate(idx);
                    KeyOutcome::Changed
                }
                None => KeyOutcome::Ignored,
            },
            Key::Enter => {
                self.status = PromptStatus::Done;
                KeyOutcome::Submitted
            }
            Key::Interrupt => KeyOutcome::Interrupted,
            _ => KeyOutcome::Ignored,
        }
    }
}

/// Frame for the current state.
///
/// Idle: the bullet header, then `❯ ` and the buffer verbatim. The input row wraps like any
/// other line, so its extent is `ceil((2 + buffer width) / columns)`. Done: one collapsed line
/// with the trimmed answer in cyan.
pub fn render_input(message: &str, state: &TextInputState) -> Frame {
    if state.status() == PromptStatus::Done {
        return Frame::new(format!(
            "{} {message}  {}",
            done_bullet(),
            cyan(state.value())
        ));
    }

    Frame::from_lines([
        format!("{} {}", bright_blue(BULLET), bold(message)),
        format!("{} {}", dim(POINTER), state.buffer()),
    ])
}

/// A free-text prompt.
pub struct TextInputPrompt {
    message: String,
}

impl TextInputPrompt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Drive the prompt until Enter or Ctrl-C and return the trimmed answer.
    pub fn run<T: Terminal + ?Sized>(self, terminal: &mut T) -> Result<String, PromptError> {
        let mut guard = RawModeGuard::enter(terminal)?;
        let term = guard.terminal_mut();

        let mut gate = OutputGate::new();
        gate.push(TerminalCmd::BracketedPasteEnable);
        gate.flush(term)?;

        let result = self.read_answer(term);

        gate.push(TerminalCmd::BracketedPasteDisable);
        gate.flush(term)?;
        result
    }

    fn read_answer<T: Terminal + ?Sized>(&self, term: &mut T) -> Result<String, PromptError> {
        let mut state = TextInputState::new();
        let mut redraw = RedrawController::new();

        redraw.redraw(term, &render_input(&self.message, &state))?;
        loop {
            let key = term.read_key()?;
            match state.handle_key(&key) {
                KeyOutcome::Ignored => {}
                KeyOutcome::Changed => redraw.redraw(term, &render_input(&self.message, &state))?,
                KeyOutcome::Submitted => {
                    redraw.finish(term, render_input(&self.message, &state).as_str())?;
                    tracing::debug!(message = %self.message, len = state.value().len(), "input resolved");
                    return Ok(state.value().to_string());
                }
                KeyOutcome::Interrupted => {
                    redraw.abandon(term)?;
                    return Err(PromptError::Interrupted);
                }
            }
        }
    }
}

/// Ask for a line of free text; resolves to the trimmed buffer on Enter.
pub fn text_input_prompt<T: Terminal + ?Sized>(
    terminal: &mut T,
    message: &str,
) -> Result<String, PromptError> {
    TextInputPrompt::new(message).run(terminal)
}

#[cfg(test)]
mod tests {
    use super::{render_input, TextInputState};
    use crate::core::input::Key;
    use crate::core::text::ansi::strip_ansi;
    use crate::widgets::{KeyOutcome, PromptStatus};

    fn type_text(state: &mut TextInputState, text: &str) {
        for ch in text.chars() {
            state.handle_key(&Key::Char(ch));
        }
    }

    #[test]
    fn submission_trims_surrounding_whitespace() {
        let mut state = TextInputState::new();
        type_text(&mut state, "  hello  ");
        assert_eq!(state.handle_key(&Key::Enter), KeyOutcome::Submitted);
        assert_eq!(state.value(), "hello");
        assert_eq!(state.buffer(), "  hello  ");
    }

    #[test]
    fn backspace_on_empty_is_a_no_op() {
        let mut state = TextInputState::new();
        assert_eq!(state.handle_key(&Key::Backspace), KeyOutcome::Ignored);
        assert_eq!(state.buffer(), "");
    }

    #[test]
    fn backspace_removes_last_grapheme() {
        let mut state = TextInputState::new();
        type_text(&mut state, "café");
        assert_eq!(state.handle_key(&Key::Backspace), KeyOutcome::Changed);
        assert_eq!(state.buffer(), "caf");
    }

    #[test]
    fn non_printable_keys_are_ignored() {
        let mut state = TextInputState::new();
        for key in [Key::Up, Key::Left, Key::Escape, Key::Tab, Key::Other("\x1b[15~".into())] {
            assert_eq!(state.handle_key(&key), KeyOutcome::Ignored);
        }
        assert_eq!(state.buffer(), "");
    }

    #[test]
    fn paste_drops_line_breaks() {
        let mut state = TextInputState::new();
        state.handle_key(&Key::Paste("one\ntwo\r".into()));
        assert_eq!(state.buffer(), "onetwo");
    }

    #[test]
    fn done_ignores_further_keys() {
        let mut state = TextInputState::new();
        type_text(&mut state, "x");
        state.handle_key(&Key::Enter);
        assert_eq!(state.status(), PromptStatus::Done);
        assert_eq!(state.handle_key(&Key::Char('y')), KeyOutcome::Ignored);
        assert_eq!(state.buffer(), "x");
    }

    #[test]
    fn idle_frame_extent_follows_buffer_length() {
        let mut state = TextInputState::new();
        let frame = render_input("Describe it:", &state);
        let lines: Vec<String> = frame.lines().map(strip_ansi).collect();
        assert_eq!(lines, vec!["● Describe it:", "❯ "]);
        assert_eq!(frame.extent(10), 3);

        type_text(&mut state, "12345678");
        // Header wraps to 2 rows at width 10; the input row holds exactly 10 columns.
        assert_eq!(render_input("Describe it:", &state).extent(10), 3);

        type_text(&mut state, "9");
        assert_eq!(render_input("Describe it:", &state).extent(10), 4);
    }

    #[test]
    fn done_frame_shows_trimmed_answer() {
        let mut state = TextInputState::new();
        type_text(&mut state, " a plan ");
        state.handle_key(&Key::Enter);
        assert_eq!(
            render_input("Describe it:", &state).as_str(),
            "\x1b[32m●\x1b[0m Describe it:  \x1b[36ma plan\x1b[0m"
        );
    }
}
