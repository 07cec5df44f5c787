use std::collections::VecDeque;

use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};

use crate::accumulator::MessageAccumulator;
use crate::config::AnthropicApiConfig;
use crate::error::{parse_error_message, AnthropicApiError};
use crate::events::{MessageResponse, MessageStreamItem};
use crate::headers::build_headers;
use crate::payload::MessagesRequest;
use crate::retry::{is_retryable_http_error, retry_delay_ms, MAX_RETRIES};
use crate::sse::SseStreamParser;
use crate::url::normalize_messages_url;

/// Text deltas followed by exactly one `Completed`, or an error.
pub type MessageStream = BoxStream<'static, Result<MessageStreamItem, AnthropicApiError>>;

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: Client,
    config: AnthropicApiConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicApiConfig) -> Result<Self, AnthropicApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AnthropicApiConfig {
        &self.config
    }

    pub fn normalized_endpoint(&self) -> String {
        normalize_messages_url(&self.config.base_url)
    }

    pub fn build_headers(&self, streaming: bool) -> Result<HeaderMap, AnthropicApiError> {
        let headers = build_headers(&self.config, streaming)?;
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| AnthropicApiError::InvalidHeader(format!("invalid key: {key}")))?,
                HeaderValue::from_str(&value).map_err(|_| {
                    AnthropicApiError::InvalidHeader(format!("invalid value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_request(
        &self,
        request: &MessagesRequest,
    ) -> Result<reqwest::RequestBuilder, AnthropicApiError> {
        let headers = self.build_headers(request.stream)?;
        Ok(self
            .http
            .post(self.normalized_endpoint())
            .headers(headers)
            .json(request))
    }

    pub async fn send_with_retry(
        &self,
        request: &MessagesRequest,
    ) -> Result<Response, AnthropicApiError> {
        let mut last_status: Option<StatusCode> = None;
        let mut last_error = None;

        for attempt in 0..=MAX_RETRIES {
            match self.build_request(request)?.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    last_status = Some(status);
                    let body = response.text().await.unwrap_or_else(|_| {
                        status
                            .canonical_reason()
                            .unwrap_or("request failed")
                            .to_string()
                    });
                    let message = parse_error_message(status, &body);
                    last_error = Some(message.clone());

                    if attempt < MAX_RETRIES && is_retryable_http_error(status.as_u16(), &body) {
                        tracing::debug!(attempt, status = status.as_u16(), "retrying messages request");
                        tokio::time::sleep(retry_delay_ms(attempt)).await;
                        continue;
                    }

                    return Err(AnthropicApiError::Status(status, message));
                }
                Err(error) => {
                    last_error = Some(error.to_string());
                    if attempt < MAX_RETRIES {
                        tracing::debug!(attempt, error = %error, "retrying messages request");
                        tokio::time::sleep(retry_delay_ms(attempt)).await;
                        continue;
                    }
                    return Err(AnthropicApiError::RetryExhausted {
                        status: last_status,
                        last_error,
                    });
                }
            }
        }

        Err(AnthropicApiError::RetryExhausted {
            status: last_status,
            last_error,
        })
    }

    /// Send a non-streaming request and decode the reply.
    pub async fn create_message(
        &self,
        request: &MessagesRequest,
    ) -> Result<MessageResponse, AnthropicApiError> {
        let mut request = request.clone();
        request.stream = false;
        let response = self.send_with_retry(&request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a streaming request.
    ///
    /// Nothing is sent until the stream is first polled.
    pub fn stream_message(&self, request: &MessagesRequest) -> MessageStream {
        let mut request = request.clone();
        request.stream = true;
        let state = StreamState {
            client: self.clone(),
            request,
            body: None,
            parser: SseStreamParser::default(),
            accumulator: MessageAccumulator::new(),
            pending: VecDeque::new(),
            finished: false,
        };
        stream::unfold(state, next_stream_item).boxed()
    }
}

struct StreamState {
    client: AnthropicClient,
    request: MessagesRequest,
    body: Option<BoxStream<'static, Result<Vec<u8>, reqwest::Error>>>,
    parser: SseStreamParser,
    accumulator: MessageAccumulator,
    pending: VecDeque<Result<MessageStreamItem, AnthropicApiError>>,
    finished: bool,
}

async fn next_stream_item(
    mut state: StreamState,
) -> Option<(Result<MessageStreamItem, AnthropicApiError>, StreamState)> {
    loop {
        if let Some(item) = state.pending.pop_front() {
            if matches!(item, Err(_) | Ok(MessageStreamItem::Completed(_))) {
                state.finished = true;
                state.pending.clear();
            }
            return Some((item, state));
        }
        if state.finished {
            return None;
        }

        if state.body.is_none() {
            match state.client.send_with_retry(&state.request).await {
                Ok(response) => {
                    let body = response
                        .bytes_stream()
                        .map(|chunk| chunk.map(|bytes| bytes.to_vec()));
                    state.body = Some(body.boxed());
                }
                Err(err) => {
                    state.finished = true;
                    return Some((Err(err), state));
                }
            }
        }
        let Some(body) = state.body.as_mut() else {
            return None;
        };

        match body.next().await {
            Some(Ok(chunk)) => {
                for event in state.parser.feed(&chunk) {
                    match state.accumulator.apply(event) {
                        Ok(Some(item)) => state.pending.push_back(Ok(item)),
                        Ok(None) => {}
                        Err(err) => {
                            state.pending.push_back(Err(err));
                            break;
                        }
                    }
                }
            }
            Some(Err(err)) => {
                state.finished = true;
                return Some((Err(err.into()), state));
            }
            None => {
                state.finished = true;
                return Some((Err(AnthropicApiError::IncompleteStream), state));
            }
        }
    }
}
