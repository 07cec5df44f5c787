use std::io;

use anthropic_api::AnthropicApiError;
use reenter_tui::{OverlayError, PromptError};
use thiserror::Error;

/// Failure while reading or summarizing the project.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("expected a text reply from the model")]
    MissingTextBlock,
    #[error("model reply is not valid JSON: {0}")]
    InvalidReply(#[from] serde_json::Error),
    #[error("model returned no steps")]
    NoSteps,
    #[error(transparent)]
    Api(#[from] AnthropicApiError),
}

/// Failure while saving the starting point.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("could not run `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`git {command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("could not write .gitignore: {0}")]
    Gitignore(#[source] io::Error),
    #[error("git task stopped unexpectedly: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ReenterError {
    #[error("this folder looks empty")]
    EmptyProject,
    #[error("{0}")]
    MissingContext(&'static str),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Overlay(#[from] OverlayError),
    #[error(transparent)]
    Api(#[from] AnthropicApiError),
    #[error(transparent)]
    Scout(#[from] ScoutError),
    #[error(transparent)]
    Git(#[from] GitError),
    #[error("model reply did not match the expected shape: {0}")]
    InvalidReply(#[from] serde_json::Error),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

impl ReenterError {
    /// Ctrl-C inside a prompt.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ReenterError::Prompt(err) if err.is_interrupted())
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        if self.is_interrupted() {
            130
        } else {
            1
        }
    }
}
