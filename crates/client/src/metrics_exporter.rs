//! Prometheus endpoint for the REST call metrics.
//!
//! `install` makes `metrics-exporter-prometheus` the process-wide recorder and
//! starts its HTTP listener, which serves `/metrics` until the process exits.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use tracing::info;

use crate::metrics::ATTEMPT_DURATION;

/// Buckets for a router on the local network: most calls land in tens of
/// milliseconds, configuration commits on slow hardware take seconds.
const ATTEMPT_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0];

#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    #[error("Invalid metrics address '{addr}': {source}")]
    Address {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("Prometheus exporter rejected its configuration: {0}")]
    Build(#[from] metrics_exporter_prometheus::BuildError),
}

/// Install the exporter and return the address it listens on.
///
/// # Errors
/// Fails when `bind` is not a socket address, or when the recorder cannot be
/// built or installed (for example because another recorder is active).
pub fn install(bind: &str) -> Result<SocketAddr, ExporterError> {
    let addr: SocketAddr = bind.parse().map_err(|source| ExporterError::Address {
        addr: bind.to_string(),
        source,
    })?;

    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(ATTEMPT_DURATION.to_string()), ATTEMPT_BUCKETS)?
        .with_http_listener(addr)
        .install()?;

    info!(%addr, "Serving Prometheus metrics");
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparseable_address() {
        let err = install("router:metrics").unwrap_err();
        assert!(matches!(err, ExporterError::Address { .. }));
        assert!(err.to_string().starts_with("Invalid metrics address 'router:metrics'"));
    }
}
