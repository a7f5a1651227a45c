//! REST endpoint implementations.
//!
//! Every function takes a [`RequestContext`] carrying the HTTP client, base
//! URL, credentials, retry policy and metrics collector, so the callers in
//! [`crate::client`] stay one-liners.

mod request;
mod rest;

use std::time::Duration;

use reqwest::Client;

use crate::auth::BasicAuth;
use crate::metrics::MetricsCollector;

pub use request::{RetryPolicy, send_request_with_retry};
pub use rest::{create_item, delete_item, get_item, list_items, update_item};

/// Borrowed view of everything an endpoint call needs.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub http: &'a Client,
    pub base_url: &'a str,
    pub auth: &'a BasicAuth,
    pub retry: RetryPolicy,
    /// Per-request timeout configured on `http`; reported in timeout errors.
    pub timeout: Duration,
    pub metrics: Option<&'a MetricsCollector>,
}

impl RequestContext<'_> {
    /// Full URL for a RouterOS menu path (`/ip/address` -> `<base>/rest/ip/address`).
    pub fn url(&self, path: &str) -> String {
        format!("{}/rest{}", self.base_url, path)
    }
}

/// Collection part of a path, used as the metrics `endpoint` label.
pub(crate) fn metric_endpoint(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if idx > 0 && path[idx + 1..].starts_with('*') => &path[..idx],
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_endpoint_strips_item_id() {
        assert_eq!(
            metric_endpoint("/routing/bgp/template/*2"),
            "/routing/bgp/template"
        );
        assert_eq!(
            metric_endpoint("/routing/bgp/template"),
            "/routing/bgp/template"
        );
    }
}
