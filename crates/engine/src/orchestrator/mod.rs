//! CRUD orchestration against a device.
//!
//! Responsibilities:
//! - Hold the registry, the device collaborator and the per-path locks.
//! - Hand out a [`ResourceHandle`] per resource type; the handle runs
//!   create, read, refresh, update, delete and import.
//! - Apply per-call timeouts and cancellation.
//!
//! Does NOT handle:
//! - Persisting instances between calls; callers keep the last known
//!   [`ResourceInstance`] and pass it back to `update`.
//!
//! Invariants:
//! - Calls on the same item path never overlap; calls on different paths may.
//! - Validation runs before any device call.
//! - A read never writes; an update with an empty diff never calls the device.

mod create;
mod delete;
mod import;
mod read;
mod update;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use routeros_client::{ClientError, DeviceApi, PropertyBag};
use serde::Serialize;

use crate::cancel::CancellationToken;
use crate::codec::decode_bag;
use crate::diff::Change;
use crate::error::{ReconcileError, Result};
use crate::lock::KeyedLocks;
use crate::path::ResourcePath;
use crate::registry::Registry;
use crate::schema::ResourceSchema;
use crate::value::Record;

/// Per-call limits.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Overrides the reconciler's operation timeout for this call.
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// The engine's view of one device item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInstance {
    #[serde(rename = "type")]
    pub type_name: String,
    pub id: String,
    pub path: String,
    pub values: Record,
}

/// Result of an update call.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub instance: ResourceInstance,
    /// Whether a device write was issued.
    pub written: bool,
    /// Changes that were applied (empty when nothing was written).
    pub changes: Vec<Change>,
}

/// Entry point for reconciliation calls against one device.
pub struct Reconciler<D> {
    device: Arc<D>,
    registry: Arc<Registry>,
    locks: KeyedLocks,
    operation_timeout: Option<Duration>,
}

impl<D: DeviceApi> Reconciler<D> {
    pub fn new(registry: Arc<Registry>, device: Arc<D>) -> Self {
        Self {
            device,
            registry,
            locks: KeyedLocks::new(),
            operation_timeout: None,
        }
    }

    /// Default upper bound for each call, unless `CallOptions` overrides it.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Handle for one registered resource type.
    pub fn resource(&self, type_name: &str) -> Option<ResourceHandle<'_, D>> {
        self.registry.get(type_name).map(|resource| ResourceHandle {
            reconciler: self,
            resource,
        })
    }
}

/// Operations for one resource type.
pub struct ResourceHandle<'a, D> {
    reconciler: &'a Reconciler<D>,
    resource: &'a ResourceSchema,
}

impl<'a, D: DeviceApi> ResourceHandle<'a, D> {
    pub fn schema(&self) -> &'a ResourceSchema {
        self.resource
    }

    fn paths(&self) -> ResourcePath<'a> {
        ResourcePath::of(self.resource)
    }

    fn device(&self) -> &'a D {
        &self.reconciler.device
    }

    fn validate(&self, desired: &Record, path: &str, id: Option<&str>) -> Result<()> {
        self.resource
            .schema()
            .validate(desired)
            .map_err(|errors| ReconcileError::Validation {
                path: path.to_string(),
                id: id.map(str::to_string),
                errors,
            })
    }

    /// Run `fut` under the call's timeout and cancellation token.
    async fn guarded<T>(
        &self,
        opts: &CallOptions,
        path: &str,
        id: Option<&str>,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let limit = opts.timeout.or(self.reconciler.operation_timeout);
        let timed = async {
            match limit {
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(ReconcileError::Device {
                        path: path.to_string(),
                        id: id.map(str::to_string),
                        source: ClientError::Timeout(limit),
                    }),
                },
                None => fut.await,
            }
        };

        match &opts.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(ReconcileError::Cancelled {
                        path: path.to_string(),
                        id: id.map(str::to_string),
                    }),
                    result = timed => result,
                }
            }
            None => timed.await,
        }
    }

    /// Decode a device bag into an instance with identifier `id`.
    fn instance(&self, id: &str, bag: &PropertyBag) -> Result<ResourceInstance> {
        let path = self.paths().item(id);
        let values = decode_bag(self.resource.schema(), bag)
            .map_err(|e| ReconcileError::codec(&path, Some(id), e))?;
        Ok(ResourceInstance {
            type_name: self.resource.type_name().to_string(),
            id: id.to_string(),
            path,
            values,
        })
    }

    /// GET and decode one item. Callers hold the item lock and the guard.
    async fn fetch(&self, id: &str) -> Result<ResourceInstance> {
        let item = self.paths().item(id);
        let bag = self
            .device()
            .get(&item)
            .await
            .map_err(|e| ReconcileError::from_device(&item, Some(id), e))?;
        self.instance(id, &bag)
    }
}
