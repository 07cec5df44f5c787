//! Streaming overlay: the spinner line plus a live token estimate.

use futures_util::{Stream, StreamExt};

use crate::core::style::{done_bullet, gray};
use crate::core::terminal::Terminal;
use crate::error::OverlayError;
use crate::widgets::loader::{OverlayLine, OverlayOptions, OverlayStats, Ticker};

/// One item of a streaming model reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamUpdate {
    /// A text chunk as it arrives.
    Text(String),
    /// The settled reply. Ends the overlay.
    Finished(FinalMessage),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentBlock {
    Text { text: String },
    Other,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FinalMessage {
    pub usage: Usage,
    pub content: Vec<ContentBlock>,
}

impl FinalMessage {
    /// Text of the first content block, if that block is text.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentBlock::Text { text }) => Some(text),
            _ => None,
        }
    }
}

/// Rough token estimate for a chunk: one token per four characters, rounded up.
pub(crate) fn estimate_tokens(chunk: &str) -> u64 {
    (chunk.chars().count() as u64).div_ceil(4)
}

pub struct StreamingOverlay {
    label: String,
    options: OverlayOptions,
}

impl StreamingOverlay {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            options: OverlayOptions::from_env(),
        }
    }

    pub fn with_options(mut self, options: OverlayOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn run<T, S, R, E, F>(self, term: &mut T, source: S, transform: F) -> Result<R, E>
    where
        T: Terminal + ?Sized,
        S: Stream<Item = Result<StreamUpdate, E>>,
        E: From<OverlayError>,
        F: FnOnce(String) -> Result<R, E>,
    {
        self.run_with_stats(term, source, transform).await.0
    }

    /// Consume `source` under the overlay.
    ///
    /// The counter grows with every text chunk and is replaced once by the final usage total.
    /// The completion line is written before `transform` runs.
    pub async fn run_with_stats<T, S, R, E, F>(
        self,
        term: &mut T,
        source: S,
        transform: F,
    ) -> (Result<R, E>, OverlayStats)
    where
        T: Terminal + ?Sized,
        S: Stream<Item = Result<StreamUpdate, E>>,
        E: From<OverlayError>,
        F: FnOnce(String) -> Result<R, E>,
    {
        let mut line = OverlayLine::new(self.label);
        let mut ticker = Ticker::start(self.options.tick_interval);
        let mut tokens: u64 = 0;
        tokio::pin!(source);

        line.draw(term, Some(tokens));
        let settled: Result<FinalMessage, E> = loop {
            tokio::select! {
                biased;
                item = source.next() => match item {
                    Some(Ok(StreamUpdate::Text(chunk))) => {
                        tokens += estimate_tokens(&chunk);
                        line.draw(term, Some(tokens));
                    }
                    Some(Ok(StreamUpdate::Finished(message))) => break Ok(message),
                    Some(Err(err)) => break Err(err),
                    None => break Err(OverlayError::MissingFinalMessage.into()),
                },
                _ = ticker.tick() => line.tick(term, Some(tokens)),
            }
        };
        ticker.stop();

        let text = settled.and_then(|message| {
            tokens = message.usage.total();
            message
                .first_text()
                .map(str::to_string)
                .ok_or_else(|| OverlayError::MissingTextBlock.into())
        });

        let result = match text {
            Ok(text) => {
                let summary = format!(
                    "{} {} {}",
                    done_bullet(),
                    line.label(),
                    gray(&format!("({tokens} tokens)"))
                );
                line.succeed(term, &summary);
                transform(text)
            }
            Err(err) => {
                line.fail(term);
                Err(err)
            }
        };
        tracing::debug!(
            label = %line.label(),
            tokens,
            ok = result.is_ok(),
            elapsed_ms = line.elapsed().as_millis() as u64,
            "streaming overlay settled"
        );

        let stats = line.stats(&ticker, tokens);
        (result, stats)
    }
}

/// Show a live token count while `source` streams, then hand the first text block to
/// `transform`.
///
/// A source that ends without [`StreamUpdate::Finished`], or whose final message does not start
/// with a text block, fails with the matching [`OverlayError`]. Source errors come back unchanged.
pub async fn with_streaming_overlay<T, S, R, E, F>(
    term: &mut T,
    label: &str,
    source: S,
    transform: F,
) -> Result<R, E>
where
    T: Terminal + ?Sized,
    S: Stream<Item = Result<StreamUpdate, E>>,
    E: From<OverlayError>,
    F: FnOnce(String) -> Result<R, E>,
{
    StreamingOverlay::new(label).run(term, source, transform).await
}

#[cfg(test)]
mod tests {
    use super::{estimate_tokens, ContentBlock, FinalMessage, Usage};

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("ééé"), 1);
    }

    #[test]
    fn first_text_requires_a_leading_text_block() {
        let message = FinalMessage {
            usage: Usage {
                input_tokens: 20,
                output_tokens: 5,
            },
            content: vec![ContentBlock::Other, ContentBlock::Text { text: "late".into() }],
        };
        assert_eq!(message.first_text(), None);
        assert_eq!(message.usage.total(), 25);

        let message = FinalMessage {
            content: vec![ContentBlock::Text { text: "{}".into() }],
            ..FinalMessage::default()
        };
        assert_eq!(message.first_text(), Some("{}"));
    }
}
