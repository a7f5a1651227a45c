//! Common test utilities for engine integration tests.
//!
//! # Invariants
//! - Every device starts with the factory `default` BGP template as `*1`, so
//!   the first created item is `*2` as on a fresh router.

use std::sync::Arc;

#[allow(unused_imports)]
pub use routeros_engine::testing::{DeviceCall, InMemoryDevice, bag};
#[allow(unused_imports)]
pub use routeros_engine::{
    CallOptions, Record, Reconciler, ReconcileError, Registry, ResourceInstance, Value,
};

pub const TEMPLATES: &str = "/routing/bgp/template";

/// Device holding the factory default template, with `routing-table`
/// filled in by the device on create.
#[allow(dead_code)]
pub fn device() -> InMemoryDevice {
    let device = InMemoryDevice::new().with_defaults(TEMPLATES, &[("routing-table", "main")]);
    device.seed(
        TEMPLATES,
        &[
            ("name", "default"),
            ("as", "65530"),
            ("routing-table", "main"),
            ("vrf", "main"),
        ],
    );
    device
}

/// Reconciler with the built-in registry over a fresh seeded device.
#[allow(dead_code)]
pub fn reconciler() -> (Arc<InMemoryDevice>, Reconciler<InMemoryDevice>) {
    reconciler_with(device())
}

#[allow(dead_code)]
pub fn reconciler_with(device: InMemoryDevice) -> (Arc<InMemoryDevice>, Reconciler<InMemoryDevice>) {
    let device = Arc::new(device);
    let registry = Arc::new(Registry::builtin().expect("builtin registry"));
    (Arc::clone(&device), Reconciler::new(registry, device))
}

/// Minimal valid BGP template.
#[allow(dead_code)]
pub fn template(name: &str) -> Record {
    Record::new().with("name", name).with("as", "65000")
}

#[allow(dead_code)]
pub fn opts() -> CallOptions {
    CallOptions::new()
}
