//! HTTP transports: one GET, a timeout, bounded retries.
//!
//! [`FetchJson`] is the blocking capability and [`AsyncFetchJson`] its suspendable
//! counterpart. Both concrete transports share [`decode_response`] for status and body
//! handling, and [`RetryPolicy`](crate::retry::RetryPolicy) for the attempt loop.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::{
    error::{ConnectifyError, Result},
    model::QueryParams,
};

pub mod blocking;
pub mod nonblocking;

pub use blocking::HttpTransport;
pub use nonblocking::AsyncHttpClient;

/// Fetch a JSON document, blocking the calling thread.
pub trait FetchJson {
    fn fetch_json(&self, url: &str, params: &QueryParams) -> Result<Value>;
}

/// Fetch a JSON document without blocking the runtime.
#[async_trait]
pub trait AsyncFetchJson: Send + Sync {
    async fn fetch_json(&self, url: &str, params: &QueryParams) -> Result<Value>;
}

/// Explicit acquire/release of the resources behind an [`AsyncFetchJson`].
pub trait SessionResource {
    fn open(&mut self) -> Result<()>;
    fn close(&mut self);
    fn is_open(&self) -> bool;
}

/// Turn one HTTP answer into JSON or an error.
///
/// Non-2xx: the error carries the body's `message` field, else the whole JSON body,
/// else the raw text.
pub(crate) fn decode_response(status: StatusCode, body: &str) -> Result<Value> {
    if !status.is_success() {
        return Err(ConnectifyError::api(status.as_u16(), error_message(body)));
    }

    serde_json::from_str(body).map_err(ConnectifyError::invalid_json)
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => match json.get("message") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(other @ (Value::Number(_) | Value::Array(_) | Value::Object(_))) => {
                truncate_body(&other.to_string())
            }
            _ => truncate_body(&json.to_string()),
        },
        Err(_) => truncate_body(body),
    }
}

/// Render a reqwest error with its source chain, minus the URL (it carries the API key).
pub(crate) fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut text = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_body_is_decoded() {
        let value = decode_response(StatusCode::OK, r#"{"name":"Algiers"}"#).unwrap();
        assert_eq!(value, json!({"name": "Algiers"}));
    }

    #[test]
    fn any_2xx_counts_as_success() {
        assert!(decode_response(StatusCode::ACCEPTED, "{}").is_ok());
    }

    #[test]
    fn success_with_garbage_is_invalid_json() {
        let err = decode_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(err.to_string().starts_with("OpenWeather returned invalid JSON"));
    }

    #[test]
    fn error_body_message_field_is_used() {
        let err = decode_response(
            StatusCode::UNAUTHORIZED,
            r#"{"cod":401,"message":"Invalid API key"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "OpenWeather API error (401): Invalid API key");
    }

    #[test]
    fn error_body_without_message_is_rendered_whole() {
        let err = decode_response(StatusCode::NOT_FOUND, r#"{"cod":"404"}"#).unwrap_err();
        assert_eq!(err.to_string(), r#"OpenWeather API error (404): {"cod":"404"}"#);
    }

    #[test]
    fn non_json_error_body_is_used_as_text() {
        let err = decode_response(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert_eq!(err.to_string(), "OpenWeather API error (502): upstream down");
    }

    #[test]
    fn long_text_is_truncated_on_a_char_boundary() {
        let body = "é".repeat(300);
        let err = decode_response(StatusCode::INTERNAL_SERVER_ERROR, &body).unwrap_err();
        let msg = err.to_string();
        assert!(msg.ends_with("..."));
        assert_eq!(msg.matches('é').count(), 200);
    }
}
