use std::fmt::Display;

use thiserror::Error;

pub type Result<T, E = ConnectifyError> = std::result::Result<T, E>;

/// The single error type surfaced by every client operation.
///
/// It carries no structured kind: the message prefix tells configuration,
/// transport, API and decoding failures apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConnectifyError {
    message: String,
}

impl ConnectifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Network-level failure (connect, timeout, body read).
    pub(crate) fn transport(cause: impl Display) -> Self {
        Self::new(format!("HTTP request failed: {cause}"))
    }

    /// Non-2xx answer from the provider.
    pub(crate) fn api(status: u16, message: impl Display) -> Self {
        Self::new(format!("OpenWeather API error ({status}): {message}"))
    }

    pub(crate) fn invalid_json(cause: impl Display) -> Self {
        Self::new(format!("OpenWeather returned invalid JSON: {cause}"))
    }

    pub(crate) fn retries_exhausted(attempts: u32, last: &ConnectifyError) -> Self {
        Self::new(format!("HTTP request failed after {attempts} attempts: {last}"))
    }

    pub(crate) fn session_not_initialized() -> Self {
        Self::new("Session not initialized. Open a session before issuing requests")
    }
}
