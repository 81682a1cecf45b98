use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{ConnectifyError, Result},
    model::QueryParams,
    retry::RetryPolicy,
};

use super::{FetchJson, decode_response, describe};

/// Thread-blocking transport; backoff sleeps park the calling thread.
///
/// Must not be created or used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    policy: RetryPolicy,
}

impl HttpTransport {
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConnectifyError::new(format!("Failed to build HTTP client: {}", describe(e))))?;

        Ok(Self { http, policy })
    }

    fn attempt(&self, url: &str, params: &QueryParams) -> Result<Value> {
        let res = self
            .http
            .get(url)
            .query(params)
            .send()
            .map_err(|e| ConnectifyError::transport(describe(e)))?;

        let status = res.status();
        let body = res.text().map_err(|e| ConnectifyError::transport(describe(e)))?;

        decode_response(status, &body)
    }
}

impl FetchJson for HttpTransport {
    fn fetch_json(&self, url: &str, params: &QueryParams) -> Result<Value> {
        debug!(url, attempts = self.policy.attempts(), "GET (blocking)");
        self.policy.run_blocking(|_| self.attempt(url, params))
    }
}
