//! Bounded retries with exponential backoff.
//!
//! One attempt loop, two ways of waiting between attempts: [`RetryPolicy::run_blocking`]
//! parks the calling thread, [`RetryPolicy::run`] awaits a tokio timer so other tasks on
//! the same runtime keep making progress.

use std::{future::Future, thread, time::Duration};

use tracing::warn;

use crate::error::{ConnectifyError, Result};

pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { retries: DEFAULT_RETRIES, backoff_base: DEFAULT_BACKOFF_BASE }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff_base: Duration) -> Self {
        Self { retries, backoff_base }
    }

    /// Total number of attempts, the initial one included.
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay after the failed attempt `attempt` (0-based): `base * 2^attempt`, no jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `op` until it succeeds or attempts run out, sleeping the current thread
    /// between attempts.
    pub fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        self.run_blocking_with(thread::sleep, op)
    }

    pub(crate) fn run_blocking_with<T, F, S>(&self, mut sleep: S, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
        S: FnMut(Duration),
    {
        let mut attempt = 0;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) => match self.next_delay(attempt, &err) {
                    Some(delay) => sleep(delay),
                    None => return Err(ConnectifyError::retries_exhausted(self.attempts(), &err)),
                },
            }
            attempt += 1;
        }
    }

    /// Async twin of [`run_blocking`](Self::run_blocking); the backoff only suspends the
    /// calling task.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => match self.next_delay(attempt, &err) {
                    Some(delay) => tokio::time::sleep(delay).await,
                    None => return Err(ConnectifyError::retries_exhausted(self.attempts(), &err)),
                },
            }
            attempt += 1;
        }
    }

    /// `None` once `attempt` was the last one allowed.
    fn next_delay(&self, attempt: u32, err: &ConnectifyError) -> Option<Duration> {
        if attempt >= self.retries {
            return None;
        }
        let delay = self.backoff(attempt);
        warn!(
            attempt = attempt + 1,
            of = self.attempts(),
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "request attempt failed, retrying"
        );
        Some(delay)
    }
}
