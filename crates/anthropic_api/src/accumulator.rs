use crate::error::AnthropicApiError;
use crate::events::{
    ContentDelta, MessageResponse, MessageStreamEvent, MessageStreamItem, ResponseContent,
};

/// Folds stream events into text deltas and one settled [`MessageResponse`].
#[derive(Debug, Clone, Default)]
pub struct MessageAccumulator {
    message: MessageResponse,
    completed: bool,
}

impl MessageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Snapshot of what has been accumulated so far.
    pub fn message(&self) -> &MessageResponse {
        &self.message
    }

    /// Apply one event. Yields a text delta for each text chunk and the settled message on
    /// `message_stop`; an `error` event fails the stream.
    pub fn apply(
        &mut self,
        event: MessageStreamEvent,
    ) -> Result<Option<MessageStreamItem>, AnthropicApiError> {
        match event {
            MessageStreamEvent::MessageStart { message } => {
                self.message = message;
                Ok(None)
            }
            MessageStreamEvent::ContentBlockStart {
                index,
                content_block,
            } => {
                let content = &mut self.message.content;
                if content.len() <= index {
                    content.resize(index + 1, ResponseContent::Other);
                }
                content[index] = content_block;
                Ok(None)
            }
            MessageStreamEvent::ContentBlockDelta {
                index,
                delta: ContentDelta::TextDelta { text },
            } => {
                let content = &mut self.message.content;
                if content.len() <= index {
                    content.resize(index + 1, ResponseContent::Other);
                }
                match &mut content[index] {
                    ResponseContent::Text { text: block } => block.push_str(&text),
                    slot @ ResponseContent::Other => {
                        *slot = ResponseContent::Text { text: text.clone() }
                    }
                }
                Ok(Some(MessageStreamItem::TextDelta(text)))
            }
            MessageStreamEvent::ContentBlockDelta { .. }
            | MessageStreamEvent::ContentBlockStop { .. }
            | MessageStreamEvent::Ping => Ok(None),
            MessageStreamEvent::MessageDelta { delta, usage } => {
                if delta.stop_reason.is_some() {
                    self.message.stop_reason = delta.stop_reason;
                }
                // Output tokens in message_delta are cumulative.
                self.message.usage.output_tokens = usage.output_tokens;
                Ok(None)
            }
            MessageStreamEvent::MessageStop => {
                self.completed = true;
                Ok(Some(MessageStreamItem::Completed(self.message.clone())))
            }
            MessageStreamEvent::Error { error } => Err(AnthropicApiError::StreamFailed {
                kind: error.kind,
                message: error
                    .message
                    .unwrap_or_else(|| "unknown stream error".to_owned()),
            }),
        }
    }
}
