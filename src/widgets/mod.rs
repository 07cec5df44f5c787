//! Interactive prompts and progress overlays.

pub mod input;
pub mod loader;
pub mod select_list;
pub mod thinking;

pub use input::{render_input, text_input_prompt, TextInputPrompt, TextInputState};
pub use loader::{format_elapsed, with_spinner, OverlayOptions, OverlayStats, Spinner};
pub use select_list::{
    render_select, select_or_other, select_prompt, Choice, SelectPrompt, SelectPromptState,
    OTHER_VALUE,
};
pub use thinking::{
    with_streaming_overlay, ContentBlock, FinalMessage, StreamUpdate, StreamingOverlay, Usage,
};

/// Lifecycle of a prompt: accepting keys, or resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PromptStatus {
    #[default]
    Idle,
    Done,
}

/// What a single keypress did to a prompt's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing changed; no redraw.
    Ignored,
    /// State changed; redraw.
    Changed,
    /// The prompt resolved.
    Submitted,
    /// Ctrl-C.
    Interrupted,
}

/// Collapse line breaks into single spaces so a label always renders on one row.
pub(crate) fn normalize_to_single_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_break = false;
    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            if !last_was_break {
                out.push(' ');
            }
            last_was_break = true;
        } else {
            out.push(ch);
            last_was_break = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize_to_single_line;

    #[test]
    fn line_breaks_become_single_spaces() {
        assert_eq!(normalize_to_single_line("a\r\nb\nc"), "a b c");
        assert_eq!(normalize_to_single_line("\n trimmed \n"), "trimmed");
    }
}
