#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex, MutexGuard};

use anthropic_api::{
    AnthropicApiError, MessageResponse, MessageStream, MessageStreamItem, MessagesRequest,
    ResponseContent, ResponseUsage,
};
use futures_util::future::LocalBoxFuture;
use futures_util::{stream, FutureExt, StreamExt};
use reenter::ModelClient;
use reenter_tui::{strip_ansi, Key, Terminal};

#[derive(Default)]
pub struct TerminalTrace {
    pub writes: Vec<String>,
    pub raw_enters: usize,
    pub raw_exits: usize,
}

/// Terminal fed from a key script; every write is recorded.
pub struct ScriptedTerminal {
    keys: VecDeque<Key>,
    state: Arc<Mutex<TerminalTrace>>,
    columns: u16,
}

impl ScriptedTerminal {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> (Self, Arc<Mutex<TerminalTrace>>) {
        let state = Arc::new(Mutex::new(TerminalTrace::default()));
        (
            Self {
                keys: keys.into_iter().collect(),
                state: Arc::clone(&state),
                columns: 80,
            },
            state,
        )
    }
}

impl Terminal for ScriptedTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        lock_unpoisoned(&self.state).raw_enters += 1;
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> io::Result<()> {
        lock_unpoisoned(&self.state).raw_exits += 1;
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

pub fn typed(text: &str) -> Vec<Key> {
    text.chars().map(Key::Char).collect()
}

/// Everything written, with styling removed.
pub fn plain_output(state: &Arc<Mutex<TerminalTrace>>) -> String {
    strip_ansi(&lock_unpoisoned(state).writes.concat())
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

type StreamScript = Vec<Result<MessageStreamItem, AnthropicApiError>>;

/// Model backend that replays queued replies and records every request.
#[derive(Default)]
pub struct ScriptedModel {
    completions: RefCell<VecDeque<Result<MessageResponse, AnthropicApiError>>>,
    streams: RefCell<VecDeque<StreamScript>>,
    requests: RefCell<Vec<MessagesRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a non-streaming reply whose first block is `text`.
    pub fn reply(self, text: &str) -> Self {
        self.completions.borrow_mut().push_back(Ok(text_message(text, 10, 5)));
        self
    }

    pub fn reply_with(self, reply: Result<MessageResponse, AnthropicApiError>) -> Self {
        self.completions.borrow_mut().push_back(reply);
        self
    }

    /// Queue a streamed reply: `text` in four-character chunks, then the settled message.
    pub fn stream_reply(self, text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut items: StreamScript = chars
            .chunks(4)
            .map(|chunk| Ok(MessageStreamItem::TextDelta(chunk.iter().collect())))
            .collect();
        items.push(Ok(MessageStreamItem::Completed(text_message(text, 100, 20))));
        self.streams.borrow_mut().push_back(items);
        self
    }

    pub fn stream_script(self, items: StreamScript) -> Self {
        self.streams.borrow_mut().push_back(items);
        self
    }

    pub fn requests(&self) -> Vec<MessagesRequest> {
        self.requests.borrow().clone()
    }
}

impl ModelClient for ScriptedModel {
    fn complete<'a>(
        &'a self,
        request: &'a MessagesRequest,
    ) -> LocalBoxFuture<'a, Result<MessageResponse, AnthropicApiError>> {
        self.requests.borrow_mut().push(request.clone());
        let next = self
            .completions
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(AnthropicApiError::IncompleteStream));
        async move { next }.boxed_local()
    }

    fn stream(&self, request: &MessagesRequest) -> MessageStream {
        self.requests.borrow_mut().push(request.clone());
        let items = self
            .streams
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| vec![Err(AnthropicApiError::IncompleteStream)]);
        stream::iter(items).boxed()
    }
}

pub fn text_message(text: &str, input_tokens: u64, output_tokens: u64) -> MessageResponse {
    MessageResponse {
        content: vec![ResponseContent::Text {
            text: text.to_string(),
        }],
        usage: ResponseUsage {
            input_tokens,
            output_tokens,
        },
        ..MessageResponse::default()
    }
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git should be installed");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A repository with an identity and one initial commit.
pub fn init_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["commit", "--allow-empty", "-m", "initial"]);
}

/// Commit identity for repositories the code under test creates itself.
pub fn set_git_identity_env() {
    for (key, value) in [
        ("GIT_AUTHOR_NAME", "Test"),
        ("GIT_AUTHOR_EMAIL", "test@test.com"),
        ("GIT_COMMITTER_NAME", "Test"),
        ("GIT_COMMITTER_EMAIL", "test@test.com"),
    ] {
        std::env::set_var(key, value);
    }
}
