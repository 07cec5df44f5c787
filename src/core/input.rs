//! Key decoding for prompt loops.
//!
//! Input arrives already split into complete sequences (see `platform::stdin_buffer`); each
//! sequence decodes to exactly one [`Key`].

const CODEPOINT_CTRL_C: u32 = 99;
const MOD_CTRL: u32 = 4;

/// A decoded keypress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Backspace,
    Tab,
    Escape,
    /// Ctrl-C, delivered as a byte while raw mode is active.
    Interrupt,
    Char(char),
    /// Bracketed paste content.
    Paste(String),
    /// Any recognized but unhandled sequence (function keys, mouse reports, ...).
    Other(String),
}

/// Decode one complete input sequence.
pub fn parse_key(data: &str) -> Key {
    match data {
        "\r" | "\n" | "\x1bOM" => return Key::Enter,
        "\x7f" | "\x08" => return Key::Backspace,
        "\x03" => return Key::Interrupt,
        "\t" => return Key::Tab,
        "\x1b" => return Key::Escape,
        _ => {}
    }

    if let Some(key) = parse_cursor_sequence(data) {
        return key;
    }
    if let Some(key) = parse_csi_u(data) {
        return key;
    }

    let mut chars = data.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_control() => Key::Char(ch),
        _ => Key::Other(data.to_string()),
    }
}

/// Arrow keys in normal (`ESC [ A`) and application (`ESC O A`) cursor mode, with optional
/// modifier parameters (`ESC [ 1 ; 2 A`).
fn parse_cursor_sequence(data: &str) -> Option<Key> {
    let rest = data
        .strip_prefix("\x1b[")
        .or_else(|| data.strip_prefix("\x1bO"))?;
    let final_byte = rest.chars().last()?;
    let params = &rest[..rest.len() - final_byte.len_utf8()];
    if !params.chars().all(|ch| ch.is_ascii_digit() || ch == ';') {
        return None;
    }
    match final_byte {
        'A' => Some(Key::Up),
        'B' => Some(Key::Down),
        'C' => Some(Key::Right),
        'D' => Some(Key::Left),
        _ => None,
    }
}

/// Minimal `CSI codepoint ; modifiers u` decoding so terminals that already report keys this
/// way still deliver Enter, Escape, Backspace and Ctrl-C.
fn parse_csi_u(data: &str) -> Option<Key> {
    let body = data.strip_prefix("\x1b[")?.strip_suffix('u')?;
    let mut parts = body.split(';');
    let codepoint: u32 = parts.next()?.split(':').next()?.parse().ok()?;
    let modifier: u32 = parts
        .next()
        .and_then(|raw| raw.split(':').next())
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(1);
    let ctrl = (modifier.saturating_sub(1) & MOD_CTRL) != 0;

    match codepoint {
        13 => Some(Key::Enter),
        27 => Some(Key::Escape),
        9 => Some(Key::Tab),
        127 => Some(Key::Backspace),
        CODEPOINT_CTRL_C if ctrl => Some(Key::Interrupt),
        cp if !ctrl => char::from_u32(cp)
            .filter(|ch| !ch.is_control())
            .map(Key::Char),
        _ => None,
    }
}
