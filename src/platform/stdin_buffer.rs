//! Splits raw stdin reads into key sequences.
//!
//! One read may carry several keys, half an escape sequence, or half a UTF-8 char. `StdinBuffer`
//! emits exactly one event per complete sequence. An escape tail that never completes (a bare ESC
//! keypress) is held until a short deadline and then delivered as typed.

use std::time::{Duration, Instant};

const ESC: char = '\x1b';
const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinEvent {
    /// One key sequence, ready for `parse_key`.
    Data(String),
    /// Everything between the bracketed-paste markers.
    Paste(String),
}

pub struct StdinBuffer {
    pending: String,
    partial_char: Vec<u8>,
    paste: Option<String>,
    hold: Duration,
    deadline: Option<Instant>,
}

impl StdinBuffer {
    pub fn new(hold_ms: u64) -> Self {
        Self {
            pending: String::new(),
            partial_char: Vec::new(),
            paste: None,
            hold: Duration::from_millis(hold_ms),
            deadline: None,
        }
    }

    /// Feed one chunk read at `now`.
    pub fn process(&mut self, chunk: &[u8], now: Instant) -> Vec<StdinEvent> {
        let text = self.decode(chunk);
        let mut events = Vec::new();
        self.absorb(&text, &mut events);
        self.deadline = (!self.pending.is_empty()).then(|| now + self.hold);
        events
    }

    /// Release the held tail verbatim once its deadline has passed.
    pub fn flush_due(&mut self, now: Instant) -> Vec<StdinEvent> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                if self.pending.is_empty() {
                    Vec::new()
                } else {
                    vec![StdinEvent::Data(std::mem::take(&mut self.pending))]
                }
            }
            _ => Vec::new(),
        }
    }

    /// Milliseconds until the held tail is due, or `None` when nothing is held.
    pub fn next_timeout_ms(&self, now: Instant) -> Option<i32> {
        self.deadline.map(|deadline| {
            let left = deadline.saturating_duration_since(now).as_millis();
            i32::try_from(left).unwrap_or(i32::MAX)
        })
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.partial_char.clear();
        self.paste = None;
        self.deadline = None;
    }

    fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.partial_char);
        bytes.extend_from_slice(chunk);
        match std::str::from_utf8(&bytes) {
            Ok(text) => text.to_owned(),
            // A char cut off at the end of the chunk; keep its first bytes for the next read.
            Err(err) if err.error_len().is_none() => {
                let (valid, tail) = bytes.split_at(err.valid_up_to());
                let text = String::from_utf8_lossy(valid).into_owned();
                self.partial_char = tail.to_vec();
                text
            }
            Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn absorb(&mut self, text: &str, events: &mut Vec<StdinEvent>) {
        let mut input = text.to_owned();
        loop {
            if let Some(mut paste) = self.paste.take() {
                paste.push_str(&input);
                let Some(end) = paste.find(PASTE_END) else {
                    self.paste = Some(paste);
                    return;
                };
                input = paste.split_off(end + PASTE_END.len());
                paste.truncate(end);
                events.push(StdinEvent::Paste(paste));
                continue;
            }

            self.pending.push_str(&input);
            let Some(start) = self.pending.find(PASTE_START) else {
                let pending = std::mem::take(&mut self.pending);
                self.pending = split_sequences(&pending, events).to_owned();
                return;
            };
            input = self.pending.split_off(start + PASTE_START.len());
            self.pending.truncate(start);
            let before = std::mem::take(&mut self.pending);
            let tail = split_sequences(&before, events);
            if !tail.is_empty() {
                events.push(StdinEvent::Data(tail.to_owned()));
            }
            self.paste = Some(String::new());
        }
    }
}

/// Push every complete sequence at the front of `input` and return the incomplete tail.
fn split_sequences<'a>(input: &'a str, events: &mut Vec<StdinEvent>) -> &'a str {
    let mut rest = input;
    while let Some(first) = rest.chars().next() {
        let len = if first == ESC {
            let end = rest
                .char_indices()
                .skip(1)
                .map(|(idx, ch)| idx + ch.len_utf8())
                .find(|&end| sequence_complete(&rest[..end]));
            match end {
                Some(end) => end,
                None => return rest,
            }
        } else {
            first.len_utf8()
        };
        events.push(StdinEvent::Data(rest[..len].to_owned()));
        rest = &rest[len..];
    }
    rest
}

/// `seq` starts with ESC and has at least one more char.
fn sequence_complete(seq: &str) -> bool {
    let body = &seq[1..];
    match body.chars().next() {
        Some('[') => csi_complete(&body[1..]),
        Some(']') => seq.len() > 2 && (seq.ends_with("\x1b\\") || seq.ends_with('\x07')),
        Some('P') | Some('_') => seq.len() > 2 && seq.ends_with("\x1b\\"),
        Some('O') => body.len() > 1,
        // Alt plus a key.
        _ => true,
    }
}

fn csi_complete(params: &str) -> bool {
    // X10 mouse: `M` plus three raw bytes.
    if let Some(report) = params.strip_prefix('M') {
        return report.chars().count() >= 3;
    }
    let Some(&last) = params.as_bytes().last() else {
        return false;
    };
    if !(0x40..=0x7e).contains(&last) {
        return false;
    }
    match params.strip_prefix('<') {
        // SGR mouse: `<b;x;y` then `M` or `m`.
        Some(sgr) => {
            let fields = &sgr[..sgr.len() - 1];
            matches!(last, b'M' | b'm')
                && fields.split(';').count() == 3
                && fields
                    .split(';')
                    .all(|field| !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()))
        }
        None => true,
    }
}
