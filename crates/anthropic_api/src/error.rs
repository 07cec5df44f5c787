use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnthropicApiError {
    #[error("ANTHROPIC_API_KEY is required")]
    MissingApiKey,
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {0} {1}")]
    Status(StatusCode, String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("retry exhausted after max attempts (status: {}, last_error: {last_error:?})", status_label(.status))]
    RetryExhausted {
        status: Option<StatusCode>,
        last_error: Option<String>,
    },
    #[error("{}", stream_failed_label(.kind, .message))]
    StreamFailed {
        kind: Option<String>,
        message: String,
    },
    #[error("stream ended before message_stop")]
    IncompleteStream,
}

fn status_label(status: &Option<StatusCode>) -> String {
    status
        .map(|status| status.as_u16().to_string())
        .unwrap_or_else(|| "n/a".to_owned())
}

fn stream_failed_label(kind: &Option<String>, message: &str) -> String {
    match kind {
        Some(kind) if !kind.trim().is_empty() => format!("stream failed ({kind}): {message}"),
        _ => format!("stream failed: {message}"),
    }
}

/// `{"type":"error","error":{"type":"...","message":"..."}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub error: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayloadFields {
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub message: Option<String>,
}

impl ErrorPayloadFields {
    fn friendly_message(&self, status: StatusCode) -> Option<String> {
        let kind = self.type_.as_deref().unwrap_or("");
        if kind == "authentication_error" || status == StatusCode::UNAUTHORIZED {
            return Some("The API key was rejected. Check ANTHROPIC_API_KEY.".to_owned());
        }
        if kind == "overloaded_error" || status.as_u16() == 529 {
            return Some("The API is overloaded right now. Try again in a moment.".to_owned());
        }
        if kind == "rate_limit_error" || status == StatusCode::TOO_MANY_REQUESTS {
            return Some("Rate limited by the API. Try again in a minute.".to_owned());
        }
        None
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|value| !value.is_empty())
    }
}

/// Human-readable message for a failed response body.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorPayload { error: Some(error) }) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = error.friendly_message(status) {
            return message;
        }
        if let Some(message) = error.message() {
            return message.to_owned();
        }
    }

    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
