//! ANSI escape recognition for width measurement.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiCodeKind {
    Csi,
    Osc,
    Apc,
    Dcs,
    Ss3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiCode {
    pub code: String,
    pub length: usize,
    pub kind: AnsiCodeKind,
}

/// Recognize a complete escape sequence starting at byte offset `pos`.
///
/// Returns `None` when `pos` is not an ESC byte or the sequence is unterminated.
pub fn extract_ansi_code(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    if pos + 1 >= bytes.len() || bytes[pos] != 0x1b {
        return None;
    }

    let end = match bytes[pos + 1] {
        b'[' => csi_end(bytes, pos)?,
        b']' | b'_' | b'P' => string_terminated_end(bytes, pos)?,
        b'O' => ss3_end(input, pos)?,
        _ => return None,
    };
    let kind = match bytes[pos + 1] {
        b'[' => AnsiCodeKind::Csi,
        b']' => AnsiCodeKind::Osc,
        b'_' => AnsiCodeKind::Apc,
        b'P' => AnsiCodeKind::Dcs,
        _ => AnsiCodeKind::Ss3,
    };

    Some(AnsiCode {
        code: input[pos..end].to_string(),
        length: end - pos,
        kind,
    })
}

/// Remove every recognized escape sequence, keeping the printable text.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut idx = 0;
    while idx < input.len() {
        if let Some(code) = extract_ansi_code(input, idx) {
            idx += code.length;
            continue;
        }
        let Some(ch) = input[idx..].chars().next() else {
            break;
        };
        out.push(ch);
        idx += ch.len_utf8();
    }
    out
}

fn csi_end(bytes: &[u8], pos: usize) -> Option<usize> {
    bytes[pos + 2..]
        .iter()
        .position(|b| (0x40..=0x7e).contains(b))
        .map(|offset| pos + 2 + offset + 1)
}

fn ss3_end(input: &str, pos: usize) -> Option<usize> {
    let end = pos + 3;
    if end > input.len() || !input.is_char_boundary(end) {
        return None;
    }
    Some(end)
}

fn string_terminated_end(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut idx = pos + 2;
    while idx < bytes.len() {
        if bytes[idx] == 0x07 {
            return Some(idx + 1);
        }
        if bytes[idx] == 0x1b && bytes.get(idx + 1) == Some(&b'\\') {
            return Some(idx + 2);
        }
        idx += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{extract_ansi_code, strip_ansi, AnsiCodeKind};

    #[test]
    fn sgr_is_recognized_as_csi() {
        let code = extract_ansi_code("\x1b[1;36mhi", 0).expect("csi");
        assert_eq!(code.code, "\x1b[1;36m");
        assert_eq!(code.length, 7);
        assert_eq!(code.kind, AnsiCodeKind::Csi);
    }

    #[test]
    fn unterminated_csi_is_not_a_code() {
        assert!(extract_ansi_code("\x1b[12", 0).is_none());
    }

    #[test]
    fn osc_with_st_terminator() {
        let code = extract_ansi_code("\x1b]0;title\x1b\\rest", 0).expect("osc");
        assert_eq!(code.code, "\x1b]0;title\x1b\\");
        assert_eq!(code.kind, AnsiCodeKind::Osc);
    }

    #[test]
    fn ss3_before_multibyte_char_does_not_split_it() {
        assert!(extract_ansi_code("\x1bOé", 0).is_none());
    }

    #[test]
    fn strip_removes_styles_and_cursor_moves() {
        let input = "\r\x1b[2K\x1b[94m●\x1b[0m \x1b[1mPick\x1b[22m\x1b[?25l";
        assert_eq!(strip_ansi(input), "\r● Pick");
    }
}
