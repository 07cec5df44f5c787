//! The seam between the orchestrator and the Messages API.

use anthropic_api::{
    AnthropicApiError, AnthropicClient, MessageResponse, MessageStream, MessageStreamItem,
    MessagesRequest, ResponseContent,
};
use futures_util::future::LocalBoxFuture;
use futures_util::{FutureExt, Stream, StreamExt};
use reenter_tui::{ContentBlock, FinalMessage, StreamUpdate, Usage};

/// System prompt shared by every call: replies must be bare JSON.
pub const JSON_SYSTEM_PROMPT: &str =
    "You are a JSON API. You only respond with raw JSON. No markdown, no explanation, no prose. Just JSON.";

/// What the orchestrator needs from a model backend.
pub trait ModelClient {
    /// One non-streaming request.
    fn complete<'a>(
        &'a self,
        request: &'a MessagesRequest,
    ) -> LocalBoxFuture<'a, Result<MessageResponse, AnthropicApiError>>;

    /// One streaming request: text deltas, then the settled reply.
    fn stream(&self, request: &MessagesRequest) -> MessageStream;
}

impl ModelClient for AnthropicClient {
    fn complete<'a>(
        &'a self,
        request: &'a MessagesRequest,
    ) -> LocalBoxFuture<'a, Result<MessageResponse, AnthropicApiError>> {
        self.create_message(request).boxed_local()
    }

    fn stream(&self, request: &MessagesRequest) -> MessageStream {
        self.stream_message(request)
    }
}

/// Adapt an API stream to what the streaming overlay consumes.
pub fn stream_updates<E>(stream: MessageStream) -> impl Stream<Item = Result<StreamUpdate, E>>
where
    E: From<AnthropicApiError>,
{
    stream.map(|item| match item {
        Ok(MessageStreamItem::TextDelta(text)) => Ok(StreamUpdate::Text(text)),
        Ok(MessageStreamItem::Completed(message)) => Ok(StreamUpdate::Finished(final_message(message))),
        Err(err) => Err(err.into()),
    })
}

fn final_message(message: MessageResponse) -> FinalMessage {
    FinalMessage {
        usage: Usage {
            input_tokens: message.usage.input_tokens,
            output_tokens: message.usage.output_tokens,
        },
        content: message
            .content
            .into_iter()
            .map(|block| match block {
                ResponseContent::Text { text } => ContentBlock::Text { text },
                ResponseContent::Other => ContentBlock::Other,
            })
            .collect(),
    }
}
