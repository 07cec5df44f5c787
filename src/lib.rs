//! Terminal prompt and progress engine for reenter.
//!
//! Invariant: all output goes through one gate. Only `core::output::OutputGate::flush(..)` writes to the
//! terminal.
//!
//! # Public API Overview
//! - Ask questions with [`select_prompt`], [`select_or_other`] and [`text_input_prompt`].
//! - Wrap async work in a progress line with [`with_spinner`] or [`with_streaming_overlay`].
//! - Drive any [`Terminal`]; [`ProcessTerminal`] is the real stdin/stdout one.
//! - Replace frames in place with [`RedrawController`].

#![allow(clippy::derivable_impls, clippy::type_complexity)]

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod platform;
pub mod render;
pub mod widgets;

/// Error types.
pub use crate::error::{OverlayError, PromptError};

/// Environment configuration.
pub use crate::config::EnvConfig;

/// Keyboard input decoding.
pub use crate::core::input::{parse_key, Key};

/// Terminal interfaces and process-backed implementation.
pub use crate::core::output::{OutputGate, TerminalCmd};
pub use crate::core::terminal::{RawModeGuard, Terminal};
pub use crate::platform::ProcessTerminal;
#[cfg(unix)]
pub use crate::platform::{
    install_signal_handlers, restore_saved_termios, HookTerminal, SignalHookGuard,
};

/// Frames and redraw.
pub use crate::render::{page_window, Frame, RedrawController, DEFAULT_PAGE_SIZE};

/// Prompts.
pub use crate::widgets::{
    render_input, render_select, select_or_other, select_prompt, text_input_prompt, Choice,
    KeyOutcome, PromptStatus, SelectPrompt, SelectPromptState, TextInputPrompt, TextInputState,
    OTHER_VALUE,
};

/// Progress overlays.
pub use crate::widgets::{
    format_elapsed, with_spinner, with_streaming_overlay, ContentBlock, FinalMessage,
    OverlayOptions, OverlayStats, Spinner, StreamUpdate, StreamingOverlay, Usage,
};

/// Style helpers.
pub use crate::core::style;

/// Visible width helper that ignores ANSI control sequences.
pub use crate::core::text::ansi::strip_ansi;
pub use crate::core::text::width::visible_width;
