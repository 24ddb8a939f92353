// src/services/fetch.rs

//! Retry-aware page fetcher.
//!
//! Fetches the target page with a fixed backoff between attempts. The
//! target sits behind an edge proxy that intermittently answers 525
//! (TLS negotiation failure with the origin); that case gets its own
//! error reason so operators recognize it in notifications.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::WatchConfig;

/// Record of a single fetch attempt. The last one feeds the terminal
/// error diagnostics once retries are exhausted.
#[derive(Debug, Clone, Default)]
struct FetchAttempt {
    status_code: Option<u16>,
    body: Option<String>,
    attempt_number: u32,
}

/// Page fetcher with bounded, fixed-interval retries.
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    backoff: Duration,
}

impl Fetcher {
    /// Create a fetcher from the watch configuration.
    pub fn new(config: &WatchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff: Duration::from_secs(config.retry_backoff_secs),
        })
    }

    /// Fetch the page body, retrying on any non-2xx response or request
    /// failure. Returns the body of the first successful response, or a
    /// transport error carrying the last attempt's status and raw body.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let total_attempts = self.max_retries + 1;
        let mut last = FetchAttempt::default();
        let mut reason = String::new();

        for attempt_number in 1..=total_attempts {
            match self.attempt(url).await {
                Ok(body) => {
                    log::debug!(
                        "Fetched {} ({} bytes) on attempt {}/{}",
                        url,
                        body.len(),
                        attempt_number,
                        total_attempts
                    );
                    return Ok(body);
                }
                Err((status_code, body, attempt_reason)) => {
                    log::warn!(
                        "Fetch attempt {}/{} for {} failed: {}",
                        attempt_number,
                        total_attempts,
                        url,
                        attempt_reason
                    );
                    last = FetchAttempt {
                        status_code,
                        body,
                        attempt_number,
                    };
                    reason = attempt_reason;
                }
            }

            if last.attempt_number < total_attempts && !self.backoff.is_zero() {
                tokio::time::sleep(self.backoff).await;
            }
        }

        Err(AppError::Transport {
            status: last.status_code,
            reason,
            raw: last.body.unwrap_or_default(),
        })
    }

    /// One request. On failure returns the status (if any response came
    /// back), the raw body (if readable), and a human-readable reason.
    async fn attempt(
        &self,
        url: &str,
    ) -> std::result::Result<String, (Option<u16>, Option<String>, String)> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Err((None, None, e.to_string())),
        };

        let status = response.status();
        let body = response.text().await.ok();

        if status.is_success() {
            match body {
                Some(body) => Ok(body),
                None => Err((
                    Some(status.as_u16()),
                    None,
                    "response body could not be read".to_string(),
                )),
            }
        } else {
            Err((Some(status.as_u16()), body, describe_status(status.as_u16())))
        }
    }
}

/// Reason text for a non-success status. 525 recurs against this target
/// and is called out distinctly.
fn describe_status(status: u16) -> String {
    if status == 525 {
        "edge TLS negotiation failure (status 525)".to_string()
    } else {
        format!("request failed with status {status}")
    }
}
