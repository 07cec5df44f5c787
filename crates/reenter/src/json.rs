//! Model replies that should be JSON.

use serde::de::DeserializeOwned;

/// Drop a surrounding markdown code fence (with or without a `json` tag) and trim.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text;
    if let Some(rest) = body.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        body = rest.strip_prefix('\n').unwrap_or(rest);
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest.strip_suffix('\n').unwrap_or(rest);
    }
    body.trim()
}

/// Parse a reply into `T`, tolerating a code fence.
pub fn parse_reply<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fence(text))
}
