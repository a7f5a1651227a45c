//! RouterOS REST API client.
//!
//! This crate provides the transport used by the reconciliation engine: a
//! [`DeviceApi`] trait describing the five collection/item operations the
//! engine needs, and [`RouterOsClient`], its implementation against the
//! RouterOS `/rest` HTTP interface.

mod api;
mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;
mod serde_helpers;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use api::DeviceApi;
pub use auth::BasicAuth;
pub use client::RouterOsClient;
pub use client::builder::RouterOsClientBuilder;
pub use endpoints::RetryPolicy;
pub use error::{ClientError, Result};
pub use metrics::{FailureKind, MenuCall, MetricsCollector};
pub use models::{DeviceErrorBody, PropertyBag};
