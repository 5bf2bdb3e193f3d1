//! Best-effort JSON extraction from model output
//!
//! Models are told to answer with bare JSON but often wrap it in a markdown
//! fence or add a sentence around it. Extraction strips one surrounding
//! fence, then keeps everything from the first `{` to the last `}`.

use crate::error::RemoteError;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn fence_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?").unwrap())
}

/// Remove a leading and/or trailing ``` fence
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let body = match fence_open().find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Slice from the first `{` to the last `}` inclusive, after fence stripping.
/// `None` when the text holds no such span.
pub fn json_candidate(text: &str) -> Option<&str> {
    let body = strip_code_fence(text);
    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&body[start..=end]),
        _ => None,
    }
}

/// Extract and parse the JSON object contained in `text`
pub fn extract_json(text: &str) -> Result<Value, RemoteError> {
    let candidate = json_candidate(text).ok_or_else(|| {
        RemoteError::MalformedResponse("no JSON object found in response".to_string())
    })?;
    serde_json::from_str(candidate).map_err(|e| RemoteError::MalformedResponse(e.to_string()))
}
