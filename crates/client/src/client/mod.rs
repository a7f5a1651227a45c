//! The RouterOS REST client.
//!
//! # Submodules
//! - [`builder`]: client construction and configuration
//! - `device`: the [`crate::DeviceApi`] implementation
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//!
//! # Invariants
//! - At most `max_connections` requests are in flight at any time; callers
//!   beyond that wait for a slot.

pub mod builder;
mod device;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::auth::BasicAuth;
use crate::endpoints::{RequestContext, RetryPolicy};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// RouterOS REST API client.
///
/// Use [`RouterOsClient::builder()`] to create one:
///
/// ```rust,ignore
/// use routeros_client::{BasicAuth, RouterOsClient};
/// use secrecy::SecretString;
///
/// let client = RouterOsClient::builder()
///     .base_url("https://192.168.88.1".to_string())
///     .auth(BasicAuth::new("admin".to_string(), SecretString::new("pw".into())))
///     .build()?;
/// ```
#[derive(Debug)]
pub struct RouterOsClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) auth: BasicAuth,
    pub(crate) retry: RetryPolicy,
    pub(crate) timeout: Duration,
    pub(crate) slots: Arc<Semaphore>,
    pub(crate) max_connections: usize,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl RouterOsClient {
    /// Create a new client builder.
    pub fn builder() -> builder::RouterOsClientBuilder {
        builder::RouterOsClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub(crate) fn context(&self) -> RequestContext<'_> {
        RequestContext {
            http: &self.http,
            base_url: &self.base_url,
            auth: &self.auth,
            retry: self.retry,
            timeout: self.timeout,
            metrics: self.metrics.as_ref(),
        }
    }

    /// Wait for a free request slot.
    pub(crate) async fn slot(&self) -> Result<SemaphorePermit<'_>> {
        self.slots.acquire().await.map_err(|_| ClientError::PoolClosed)
    }
}
