use std::io;

use thiserror::Error;

/// Failure of an interactive prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("select prompt needs at least one choice")]
    NoChoices,
    #[error("prompt interrupted")]
    Interrupted,
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

impl PromptError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, PromptError::Interrupted)
    }
}

/// Protocol failure of a streaming source, surfaced through the caller's error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("stream ended before the final message arrived")]
    MissingFinalMessage,
    #[error("final message has no text block")]
    MissingTextBlock,
}
