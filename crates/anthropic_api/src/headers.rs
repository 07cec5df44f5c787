use std::collections::BTreeMap;

use crate::config::AnthropicApiConfig;
use crate::error::AnthropicApiError;

pub const HEADER_API_KEY: &str = "x-api-key";
pub const HEADER_VERSION: &str = "anthropic-version";
pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";

/// Build a deterministic header map for Messages API requests.
pub fn build_headers(
    config: &AnthropicApiConfig,
    streaming: bool,
) -> Result<BTreeMap<String, String>, AnthropicApiError> {
    let api_key = config.api_key.trim();
    if api_key.is_empty() {
        return Err(AnthropicApiError::MissingApiKey);
    }

    let mut headers = BTreeMap::new();
    headers.insert(HEADER_API_KEY.to_owned(), api_key.to_owned());
    headers.insert(HEADER_VERSION.to_owned(), config.version.trim().to_owned());
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );
    let accept = if streaming {
        "text/event-stream"
    } else {
        "application/json"
    };
    headers.insert(HEADER_ACCEPT.to_owned(), accept.to_owned());

    for (key, value) in &config.extra_headers {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    Ok(headers)
}
