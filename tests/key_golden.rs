
use reenter_tui::{parse_key, Key};

fn expected_key(label: &str) -> Key {
    match label.split_once(':') {
        Some(("char", ch)) => {
            let decoded = fixture::unescape(ch);
            let mut chars = decoded.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Key::Char(ch),
                _ => panic!("char label must hold one character: {label}"),
            }
        }
        Some(("other", raw)) => Key::Other(fixture::unescape(raw)),
        _ => match label {
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "enter" => Key::Enter,
            "backspace" => Key::Backspace,
            "tab" => Key::Tab,
            "escape" => Key::Escape,
            "interrupt" => Key::Interrupt,
            _ => panic!("unknown key label: {label}"),
        },
    }
}

#[test]
fn key_vectors_match_fixture() {
    let raw = fixture::read_fixture("key_vectors.tsv");
    let mut checked = 0;
    for (idx, line) in raw.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split('\t').collect();
        assert_eq!(parts.len(), 2, "line {line_num}: expected 2 columns");

        let input = fixture::unescape(parts[0]);
        let expected = expected_key(parts[1].trim());
        assert_eq!(
            parse_key(&input),
            expected,
            "line {line_num}: parse_key({input:?}) mismatch"
        );
        checked += 1;
    }
    assert!(checked > 0, "fixture has no vectors");
}
