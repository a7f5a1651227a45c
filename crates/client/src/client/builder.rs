//! Client builder for constructing [`RouterOsClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating required configuration (base_url, credentials)
//! - Normalizing the base URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, TLS verification)
//!
//! # Invariants
//! - `base_url` and `auth` must be provided before calling `build()`
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning
//! - `max_connections` is at least 1

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::auth::BasicAuth;
use crate::client::RouterOsClient;
use crate::endpoints::RetryPolicy;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use routeros_config::{
    Config,
    constants::{
        DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS,
    },
};

/// Builder for [`RouterOsClient`].
pub struct RouterOsClientBuilder {
    base_url: Option<String>,
    auth: Option<BasicAuth>,
    skip_verify: bool,
    timeout: Duration,
    retry: RetryPolicy,
    max_connections: usize,
    metrics: Option<MetricsCollector>,
}

impl Default for RouterOsClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy {
                max_retries: DEFAULT_MAX_RETRIES,
                ..RetryPolicy::default()
            },
            max_connections: DEFAULT_MAX_CONNECTIONS,
            metrics: None,
        }
    }
}

impl RouterOsClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the device base URL, e.g. `https://192.168.88.1`.
    ///
    /// Trailing slashes are removed.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn auth(mut self, auth: BasicAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Skip TLS certificate verification (self-signed router certificates).
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Per-request timeout. Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: usize) -> Self {
        self.retry.max_retries = retries;
        self
    }

    /// First backoff delay; later retries double it.
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry.base_delay = delay;
        self
    }

    /// Maximum number of concurrent in-flight requests.
    pub fn max_connections(mut self, connections: usize) -> Self {
        self.max_connections = connections;
        self
    }

    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Pre-configure the builder from loaded configuration.
    pub fn from_config(mut self, config: &Config) -> Self {
        let credentials = &config.credentials;
        self.base_url = Some(config.connection.base_url.clone());
        self.auth = Some(BasicAuth::new(
            credentials.username.clone(),
            credentials.password.clone(),
        ));
        self.skip_verify = config.connection.skip_verify;
        self.timeout = config.connection.timeout;
        self.retry.max_retries = config.connection.max_retries;
        self.max_connections = config.connection.max_connections;
        self
    }

    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the [`RouterOsClient`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` was not provided.
    /// Returns [`ClientError::AuthFailed`] if credentials were not provided.
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<RouterOsClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);

        let auth = self
            .auth
            .ok_or_else(|| ClientError::AuthFailed("credentials are required".to_string()))?;

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if self.skip_verify {
            if base_url.starts_with("https://") {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder.build()?;
        let max_connections = self.max_connections.max(1);

        Ok(RouterOsClient {
            http,
            base_url,
            auth,
            retry: self.retry,
            timeout: self.timeout,
            slots: Arc::new(Semaphore::new(max_connections)),
            max_connections,
            metrics: self.metrics,
        })
    }
}
