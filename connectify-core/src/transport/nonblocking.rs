use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{ConnectifyError, Result},
    model::QueryParams,
    retry::RetryPolicy,
};

use super::{AsyncFetchJson, SessionResource, decode_response, describe};

/// Async transport owning an explicitly opened connection pool.
///
/// Requests fail with a "Session not initialized" error until [`open`](SessionResource::open)
/// has been called. All requests made while open share one pool.
#[derive(Debug)]
pub struct AsyncHttpClient {
    timeout: Duration,
    policy: RetryPolicy,
    session: Option<Client>,
}

impl AsyncHttpClient {
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Self {
        Self { timeout, policy, session: None }
    }

    pub async fn get_json(&self, url: &str, params: &QueryParams) -> Result<Value> {
        let http = self.session.as_ref().ok_or_else(ConnectifyError::session_not_initialized)?;

        debug!(url, attempts = self.policy.attempts(), "GET (async)");
        self.policy.run(|_| attempt(http, url, params)).await
    }
}

async fn attempt(http: &Client, url: &str, params: &QueryParams) -> Result<Value> {
    let res = http
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| ConnectifyError::transport(describe(e)))?;

    let status = res.status();
    let body = res.text().await.map_err(|e| ConnectifyError::transport(describe(e)))?;

    decode_response(status, &body)
}

impl SessionResource for AsyncHttpClient {
    fn open(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }

        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ConnectifyError::new(format!("Failed to build HTTP client: {}", describe(e))))?;

        self.session = Some(http);
        debug!("HTTP session opened");
        Ok(())
    }

    fn close(&mut self) {
        if self.session.take().is_some() {
            debug!("HTTP session closed");
        }
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }
}

#[async_trait]
impl AsyncFetchJson for AsyncHttpClient {
    async fn fetch_json(&self, url: &str, params: &QueryParams) -> Result<Value> {
        self.get_json(url, params).await
    }
}
