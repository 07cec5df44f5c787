//! Keypress-driven select prompt.

use crate::core::input::Key;
use crate::core::style::{bold, bright_blue, cyan, dim, done_bullet, BULLET, POINTER};
use crate::core::terminal::{RawModeGuard, Terminal};
use crate::error::PromptError;
use crate::render::{page_window, Frame, RedrawController, DEFAULT_PAGE_SIZE};
use crate::widgets::input::text_input_prompt;
use crate::widgets::{normalize_to_single_line, KeyOutcome, PromptStatus};

/// Reserved value of the synthetic "Other" choice appended by [`select_or_other`].
pub const OTHER_VALUE: &str = "__other__";

const OTHER_TITLE: &str = "Other";
const OTHER_FOLLOW_UP: &str = "Describe it:";

/// One selectable option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice<V> {
    pub title: String,
    pub value: V,
    /// Shown inline, dimmed, only while the choice is focused.
    pub description: Option<String>,
}

impl<V> Choice<V> {
    pub fn new(title: impl Into<String>, value: V) -> Self {
        Self {
            title: title.into(),
            value,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Choice<String> {
    /// A choice whose value is its own title.
    pub fn titled(title: impl Into<String>) -> Self {
        let title = title.into();
        Self::new(title.clone(), title)
    }
}

/// Focus position over a fixed, non-empty list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectPromptState {
    active: usize,
    len: usize,
    status: PromptStatus,
}

impl SelectPromptState {
    pub fn new(len: usize) -> Result<Self, PromptError> {
        if len == 0 {
            return Err(PromptError::NoChoices);
        }
        Ok(Self {
            active: 0,
            len,
            status: PromptStatus::Idle,
        })
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn status(&self) -> PromptStatus {
        self.status
    }

    pub fn move_up(&mut self) {
        self.active = (self.active + self.len - 1) % self.len;
    }

    pub fn move_down(&mut self) {
        self.active = (self.active + 1) % self.len;
    }

    /// Apply one key. Once `Done`, every key is ignored.
    pub fn handle_key(&mut self, key: &Key) -> KeyOutcome {
        if self.status == PromptStatus::Done {
            return KeyOutcome::Ignored;
        }
        match key {
            Key::Up => {
                self.move_up();
                KeyOutcome::Changed
            }
            Key::Down => {
                self.move_down();
                KeyOutcome::Changed
            }
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
/// Idle: a bright-blue bullet and the bold message, then one row per visible choice with the
/// focused row marked by a dim pointer, its title bold, and its description inline. Done: one
/// collapsed line with the chosen title in cyan.
pub fn render_select<V>(
    message: &str,
    choices: &[Choice<V>],
    state: &SelectPromptState,
    page_size: usize,
) -> Frame {
    if state.status() == PromptStatus::Done {
        let title = choices
            .get(state.active())
            .map(|choice| normalize_to_single_line(&choice.title))
            .unwrap_or_default();
        return Frame::new(format!("{} {message}  {}", done_bullet(), cyan(&title)));
    }

    let mut lines = Vec::with_capacity(page_size + 1);
    lines.push(format!("{} {}", bright_blue(BULLET), bold(message)));

    for idx in page_window(state.active(), choices.len(), page_size) {
        let choice = &choices[idx];
        let title = normalize_to_single_line(&choice.title);
        if idx == state.active() {
            let description = choice
                .description
                .as_deref()
                .map(normalize_to_single_line)
                .filter(|desc| !desc.is_empty())
                .map(|desc| format!("  {}", dim(&desc)))
                .unwrap_or_default();
            lines.push(format!("{} {}{description}", dim(POINTER), bold(&title)));
        } else {
            lines.push(format!("  {title}"));
        }
    }

    Frame::from_lines(lines).with_hidden_cursor()
}

/// A select prompt over borrowed choices.
pub struct SelectPrompt<'c, V> {
    message: String,
    choices: &'c [Choice<V>],
    page_size: usize,
}

impl<'c, V: Clone> SelectPrompt<'c, V> {
    pub fn new(message: impl Into<String>, choices: &'c [Choice<V>]) -> Self {
        Self {
            message: message.into(),
            choices,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Drive the prompt until Enter or Ctrl-C.
    ///
    /// An empty choice list fails before raw mode is entered. Raw mode and cursor visibility are
    /// restored on every exit path.
    pub fn run<T: Terminal + ?Sized>(self, terminal: &mut T) -> Result<V, PromptError> {
        let mut state = SelectPromptState::new(self.choices.len())?;
        let mut guard = RawModeGuard::enter(terminal)?;
        let term = guard.terminal_mut();
        let mut redraw = RedrawController::new();

        redraw.redraw(term, &self.render(&state))?;
        loop {
            let key = term.read_key()?;
            match state.handle_key(&key) {
                KeyOutcome::Ignored => {}
                KeyOutcome::Changed => redraw.redraw(term, &self.render(&state))?,
                KeyOutcome::Submitted => {
                    redraw.finish(term, self.render(&state).as_str())?;
                    let choice = &self.choices[state.active()];
                    tracing::debug!(message = %self.message, choice = %choice.title, "select resolved");
                    return Ok(choice.value.clone());
                }
                KeyOutcome::Interrupted => {
                    redraw.abandon(term)?;
                    return Err(PromptError::Interrupted);
                }
            }
        }
    }

    fn render(&self, state: &SelectPromptState) -> Frame {
        render_select(&self.message, self.choices, state, self.page_size)
    }
}

/// Ask the user to pick one of `choices`; resolves to the focused choice's value on Enter.
pub fn select_prompt<T, V>(
    terminal: &mut T,
    message: &str,
    choices: &[Choice<V>],
) -> Result<V, PromptError>
where
    T: Terminal + ?Sized,
    V: Clone,
{
    SelectPrompt::new(message, choices).run(terminal)
}

/// Like [`select_prompt`], with a trailing "Other" choice that asks for free text instead.
///
/// Picking "Other" runs a follow-up text prompt and returns its trimmed answer, never
/// [`OTHER_VALUE`].
pub fn select_or_other<T>(
    terminal: &mut T,
    message: &str,
    choices: &[Choice<String>],
) -> Result<String, PromptError>
where
    T: Terminal + ?Sized,
{
    let mut with_other = choices.to_vec();
    with_other.push(Choice::new(OTHER_TITLE, OTHER_VALUE.to_string()));

    let picked = select_prompt(terminal, message, &with_other)?;
    if picked == OTHER_VALUE {
        return text_input_prompt(terminal, OTHER_FOLLOW_UP);
    }
    Ok(picked)
}
