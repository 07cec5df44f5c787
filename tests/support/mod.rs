#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use reenter_tui::{Key, Terminal};

#[derive(Default)]
pub struct TerminalTrace {
    pub writes: Vec<String>,
    pub raw_enters: usize,
    pub raw_exits: usize,
    pub in_raw_mode: bool,
}

/// Terminal fed from a key script; every write is recorded.
pub struct ScriptedTerminal {
    keys: VecDeque<Key>,
    state: Arc<Mutex<TerminalTrace>>,
    columns: u16,
}

impl ScriptedTerminal {
    pub fn new(columns: u16, keys: impl IntoIterator<Item = Key>) -> (Self, Arc<Mutex<TerminalTrace>>) {
        let state = Arc::new(Mutex::new(TerminalTrace::default()));
        (
            Self {
                keys: keys.into_iter().collect(),
                state: Arc::clone(&state),
                columns,
            },
            state,
        )
    }

    pub fn push_keys(&mut self, keys: impl IntoIterator<Item = Key>) {
        self.keys.extend(keys);
    }
}

impl Terminal for ScriptedTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        let mut state = lock_unpoisoned(&self.state);
        state.raw_enters += 1;
        state.in_raw_mode = true;
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> io::Result<()> {
        let mut state = lock_unpoisoned(&self.state);
        state.raw_exits += 1;
        state.in_raw_mode = false;
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        lock_unpoisoned(&self.state).writes.push(data.to_string());
        Ok(())
    }

    fn columns(&self) -> u16 {
        self.columns
    }
}

/// Type each character of `text` as a separate key.
pub fn typed(text: &str) -> Vec<Key> {
    text.chars().map(Key::Char).collect()
}

pub fn rendered_output(state: &Arc<Mutex<TerminalTrace>>) -> String {
    lock_unpoisoned(state).writes.join("")
}

pub fn write_count(state: &Arc<Mutex<TerminalTrace>>) -> usize {
    lock_unpoisoned(state).writes.len()
}

/// What the user would see after all recorded writes.
pub fn screen(state: &Arc<Mutex<TerminalTrace>>, columns: u16) -> Vec<String> {
    let mut screen = VirtualScreen::new(columns);
    screen.feed(&rendered_output(state));
    screen.visible_lines()
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Minimal terminal emulator: carriage return, line feed, erase line, cursor up, and deferred
/// autowrap. SGR and mode toggles are ignored. Every character is one column wide.
pub struct VirtualScreen {
    columns: usize,
    rows: Vec<Vec<char>>,
    row: usize,
    col: usize,
}

impl VirtualScreen {
    pub fn new(columns: u16) -> Self {
        Self {
            columns: usize::from(columns.max(1)),
            rows: vec![Vec::new()],
            row: 0,
            col: 0,
        }
    }

    pub fn feed(&mut self, data: &str) {
        let mut chars = data.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' => self.col = 0,
                '\n' => self.line_feed(),
                '\x1b' => {
                    if chars.peek() != Some(&'[') {
                        continue;
                    }
                    chars.next();
                    let mut params = String::new();
                    let mut final_byte = None;
                    for next in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&next) {
                            final_byte = Some(next);
                            break;
                        }
                        params.push(next);
                    }
                    self.apply_csi(&params, final_byte);
                }
                ch => self.put(ch),
            }
        }
    }

    fn apply_csi(&mut self, params: &str, final_byte: Option<char>) {
        match final_byte {
            Some('K') if params == "2" => self.rows[self.row].clear(),
            Some('A') => {
                let n = params.parse::<usize>().unwrap_or(1);
                self.row = self.row.saturating_sub(n);
            }
            _ => {}
        }
    }

    fn line_feed(&mut self) {
        self.row += 1;
        if self.row == self.rows.len() {
            self.rows.push(Vec::new());
        }
    }

    fn put(&mut self, ch: char) {
        if self.col >= self.columns {
            self.col = 0;
            self.line_feed();
        }
        let row = &mut self.rows[self.row];
        if row.len() <= self.col {
            row.resize(self.col + 1, ' ');
        }
        row[self.col] = ch;
        self.col += 1;
    }

    /// Rows with trailing spaces trimmed, without trailing blank rows.
    pub fn visible_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .rows
            .iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}
