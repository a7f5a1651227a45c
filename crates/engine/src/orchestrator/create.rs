//! Create: validate, fill defaults, POST, then read the item back.

use routeros_client::{ClientError, DeviceApi, PropertyBag};
use tracing::{debug, info};

use super::{CallOptions, ResourceHandle, ResourceInstance};
use crate::codec::encode_record;
use crate::error::{ReconcileError, Result};
use crate::path::identifier_of;
use crate::value::Record;

/// Key some firmware uses instead of `.id` when answering an add.
const RET_KEY: &str = "ret";

impl<D: DeviceApi> ResourceHandle<'_, D> {
    /// Create a new item from `desired`.
    ///
    /// Supplied values plus the defaults of unsupplied optional attributes
    /// are sent in one call. The returned instance is what the device
    /// reports after the create, including computed attributes.
    pub async fn create(&self, desired: &Record, opts: &CallOptions) -> Result<ResourceInstance> {
        let collection = self.resource.path();
        self.validate(desired, collection, None)?;

        let payload = desired.with_defaults(self.resource.schema());
        let bag = encode_record(self.resource.schema(), &payload)
            .map_err(|e| ReconcileError::codec(collection, None, e))?;

        self.guarded(opts, collection, None, async {
            let _guard = self.reconciler.locks.lock(collection).await;
            debug!(resource = %self.resource.type_name(), keys = bag.len(), "Creating item");

            let created = self
                .device()
                .create(collection, &bag)
                .await
                .map_err(|e| ReconcileError::from_device(collection, None, e))?;
            let id = self.created_id(&created).ok_or_else(|| ReconcileError::Device {
                path: collection.to_string(),
                id: None,
                source: ClientError::InvalidResponse(
                    "device did not report an identifier for the new item".to_string(),
                ),
            })?;
            info!(resource = %self.resource.type_name(), %id, "Created item");

            let item = self.paths().item(&id);
            let _item_guard = self.reconciler.locks.lock(&item).await;
            self.fetch(&id).await
        })
        .await
    }

    fn created_id(&self, created: &PropertyBag) -> Option<String> {
        identifier_of(self.resource, created).or_else(|| {
            created
                .get(RET_KEY)
                .filter(|ret| !ret.is_empty())
                .cloned()
        })
    }
}
