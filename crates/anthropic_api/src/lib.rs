//! Transport-only client for the Anthropic Messages API.
//!
//! This crate builds requests, sends them with retry, and turns the server-sent event stream
//! into text deltas plus one settled message. It has no terminal or UI coupling.

pub mod accumulator;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod headers;
pub mod payload;
pub mod retry;
pub mod sse;
pub mod url;

pub use accumulator::MessageAccumulator;
pub use client::{AnthropicClient, MessageStream};
pub use config::AnthropicApiConfig;
pub use error::AnthropicApiError;
pub use events::{
    ContentDelta, MessageResponse, MessageStreamEvent, MessageStreamItem, ResponseContent,
    ResponseUsage,
};
pub use payload::{Message, MessagesRequest, Role};
pub use sse::SseStreamParser;
pub use url::normalize_messages_url;
