//! SGR styling helpers.
//!
//! Each helper wraps its input in its SGR code and a full reset. Fragments are never nested, so a
//! reset cannot cancel an outer style.

pub const BULLET: &str = "●";
pub const POINTER: &str = "❯";

fn wrap(code: u8, text: &str) -> String {
    format!("\x1b[{code}m{text}\x1b[0m")
}

pub fn bold(text: &str) -> String {
    wrap(1, text)
}

/// Secondary text (pointer glyph, descriptions), drawn gray.
pub fn dim(text: &str) -> String {
    gray(text)
}

pub fn cyan(text: &str) -> String {
    wrap(36, text)
}

pub fn green(text: &str) -> String {
    wrap(32, text)
}

pub fn gray(text: &str) -> String {
    wrap(90, text)
}

pub fn white(text: &str) -> String {
    wrap(37, text)
}

pub fn bright_blue(text: &str) -> String {
    wrap(94, text)
}

/// Pulsing status dot: white on the bright phase, gray otherwise.
pub fn pulse_dot(bright: bool) -> String {
    if bright {
        white(BULLET)
    } else {
        gray(BULLET)
    }
}

/// Green bullet used on every collapsed "done" line.
pub fn done_bullet() -> String {
    green(BULLET)
}
