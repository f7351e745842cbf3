use std::time::Duration;

use reqwest::{
    header::{
        HeaderMap,
        HeaderValue,
        ACCEPT,
    },
    Client,
    Response,
    StatusCode,
};

use crate::core::MindmateError;

const USER_AGENT: &str = concat!("mindmate/", env!("CARGO_PKG_VERSION"), " (+reqwest)");

pub fn http_client(timeout: Duration) -> Result<Client, MindmateError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| MindmateError::Custom(format!("HTTP client build failed: {e}")))
}

/// Parses a body as JSON, keeping it as a plain string when it is not JSON.
pub fn parse_json_or_text(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

/// The message to show for a failed response: the server's `message` (or `error`)
/// field, then the status text, then `fallback`.
pub fn error_message(status: StatusCode, body: &str, fallback: &str) -> String {
    let parsed = parse_json_or_text(body);

    let from_body = match &parsed {
        serde_json::Value::Object(map) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string),
        _ => None,
    };

    from_body
        .filter(|m| !m.trim().is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}

/// Turns a non-success response into an error carrying the user-facing message.
pub async fn ensure_success(resp: Response, fallback: &str) -> Result<Response, MindmateError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = error_message(status, &body, fallback);

    if status == StatusCode::UNAUTHORIZED {
        return Err(MindmateError::Unauthorized(message));
    }

    Err(MindmateError::Api { status: status.as_u16(), message })
}
