//! CLI command implementations.

pub mod desired;
pub mod instance;
pub mod resources;

use std::sync::Arc;

use anyhow::{Context, Result};
use routeros_client::{MetricsCollector, RouterOsClient};
use routeros_config::Config;
use routeros_engine::{
    CallOptions, Reconciler, Registry, ResourceHandle, ResourceSchema,
};

use crate::cancellation::CancellationToken;

/// Load the built-in registry.
pub fn registry() -> Result<Registry> {
    Registry::builtin().context("Built-in resource registry is inconsistent")
}

/// Look up a resource type, listing the known types on failure.
pub fn resource_schema<'a>(registry: &'a Registry, type_name: &str) -> Result<&'a ResourceSchema> {
    registry.get(type_name).with_context(|| {
        format!(
            "Unknown resource type '{}'. Known types: {}",
            type_name,
            registry.type_names().collect::<Vec<_>>().join(", ")
        )
    })
}

/// Build a device client from loaded configuration.
pub fn build_client_from_config(config: &Config, metrics: bool) -> Result<RouterOsClient> {
    let mut builder = RouterOsClient::builder().from_config(config);
    if metrics {
        builder = builder.metrics(MetricsCollector::new());
    }
    builder.build().context("Failed to build RouterOS client")
}

/// Build a reconciler for the built-in registry against the configured device.
pub fn build_reconciler(config: &Config, metrics: bool) -> Result<Reconciler<RouterOsClient>> {
    let client = build_client_from_config(config, metrics)?;
    Ok(
        Reconciler::new(Arc::new(registry()?), Arc::new(client))
            .with_operation_timeout(config.engine.operation_timeout),
    )
}

/// Handle for `type_name`, or an error naming the known types.
pub fn handle<'a>(
    reconciler: &'a Reconciler<RouterOsClient>,
    type_name: &str,
) -> Result<ResourceHandle<'a, RouterOsClient>> {
    resource_schema(reconciler.registry(), type_name)?;
    reconciler
        .resource(type_name)
        .with_context(|| format!("Unknown resource type '{}'", type_name))
}

/// Per-call options tied to the process-wide Ctrl+C token.
pub fn call_options(cancel: &CancellationToken) -> CallOptions {
    CallOptions::new().with_cancel(cancel.clone())
}
