//! Retry helper for HTTP requests with exponential backoff.
//!
//! Retries 429/502/503/504 responses, waiting `base_delay * 2^attempt`
//! (capped at `max_delay`) or the server's `Retry-After` when present.
//! Transport failures are retried for every method except `POST`, which
//! creates objects on the device and must not be replayed blindly.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{RequestBuilder, Response};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::{MenuCall, MetricsCollector};
use crate::models::DeviceErrorBody;

/// Retry behaviour for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 0 disables retrying.
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt + 1`.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16) as u32);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Parse a delta-seconds `Retry-After` header.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Turn a non-success response into the matching `ClientError`.
async fn error_from_response(response: Response, retry_after: Option<Duration>) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().to_string();

    if status == 404 {
        return ClientError::NotFound(url);
    }
    if status == 429 {
        return ClientError::RateLimited(retry_after);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let (message, detail) = match serde_json::from_str::<DeviceErrorBody>(&body) {
        Ok(parsed) => (parsed.message, parsed.detail),
        Err(_) => (body, None),
    };

    match status {
        401 => ClientError::Unauthorized(message),
        403 => ClientError::Forbidden(detail.unwrap_or(message)),
        _ => ClientError::ApiError {
            status,
            url,
            message,
            detail,
        },
    }
}

/// Send a request, retrying transient failures according to `policy`.
///
/// `endpoint` and `method` label metrics and log lines; `timeout` is the
/// per-request timeout configured on the HTTP client.
///
/// # Errors
///
/// Non-retryable failures are returned as-is. When retries run out the last
/// failure is wrapped in `ClientError::MaxRetriesExceeded`.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    policy: RetryPolicy,
    endpoint: &str,
    method: &str,
    timeout: Duration,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let retry_transport = method != "POST";
    let call = MenuCall::new(endpoint, method);
    let mut attempt = 0usize;

    loop {
        let Some(attempt_builder) = builder.try_clone() else {
            debug!("Request builder cannot be cloned, single attempt only");
            return builder
                .send()
                .await
                .map_err(|e| ClientError::from_transport(e, endpoint, timeout));
        };

        if let Some(m) = metrics {
            m.attempt_started(call);
        }
        let started = Instant::now();

        let (failure, server_delay) = match attempt_builder.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if let Some(m) = metrics {
                    m.attempt_finished(call, started.elapsed(), Some(status));
                }
                if response.status().is_success() {
                    if attempt > 0 {
                        debug!(attempt = attempt + 1, "Request succeeded after retry");
                    }
                    return Ok(response);
                }

                let server_delay = retry_after(response.headers());
                let error = error_from_response(response, server_delay).await;
                if !ClientError::is_retryable_status(status) {
                    if let Some(m) = metrics {
                        m.failed(call, &error);
                    }
                    return Err(error);
                }
                (error, server_delay)
            }
            Err(e) => {
                if let Some(m) = metrics {
                    m.attempt_finished(call, started.elapsed(), None);
                }
                let error = ClientError::from_transport(e, endpoint, timeout);
                if !retry_transport || !error.is_retryable() {
                    if let Some(m) = metrics {
                        m.failed(call, &error);
                    }
                    return Err(error);
                }
                (error, None)
            }
        };

        if attempt >= policy.max_retries {
            debug!(attempts = attempt + 1, %endpoint, "Max retries exhausted");
            let error = ClientError::MaxRetriesExceeded(attempt + 1, Box::new(failure));
            if let Some(m) = metrics {
                m.failed(call, &error);
            }
            return Err(error);
        }

        let delay = server_delay
            .map(|d| d.min(policy.max_delay))
            .unwrap_or_else(|| policy.backoff(attempt));
        debug!(
            attempt = attempt + 1,
            max_retries = policy.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %failure,
            "Transient failure, retrying"
        );
        if let Some(m) = metrics {
            m.retrying(call, attempt + 1);
        }
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
