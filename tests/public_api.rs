#![allow(unused_imports)]

use reenter_tui::style::{bold, bright_blue, cyan, dim, done_bullet, gray, green, pulse_dot, white};
use reenter_tui::{
    format_elapsed, page_window, parse_key, render_input, render_select, select_or_other,
    select_prompt, strip_ansi, text_input_prompt, visible_width, with_spinner,
    with_streaming_overlay, Choice, ContentBlock, EnvConfig, FinalMessage, Frame, Key, KeyOutcome,
    OutputGate, OverlayError, OverlayOptions, OverlayStats, ProcessTerminal, PromptError,
    PromptStatus, RawModeGuard, RedrawController, SelectPrompt, SelectPromptState, Spinner,
    StreamUpdate, StreamingOverlay, Terminal, TerminalCmd, TextInputPrompt, TextInputState, Usage,
    DEFAULT_PAGE_SIZE, OTHER_VALUE,
};

#[cfg(unix)]
use reenter_tui::{install_signal_handlers, restore_saved_termios, HookTerminal, SignalHookGuard};

#[test]
fn public_api_exports_compile() {}
