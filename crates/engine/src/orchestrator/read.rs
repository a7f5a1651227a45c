//! Read and refresh.

use routeros_client::DeviceApi;
use tracing::debug;

use super::{CallOptions, ResourceHandle, ResourceInstance};
use crate::error::{ReconcileError, Result};

impl<D: DeviceApi> ResourceHandle<'_, D> {
    /// Fetch the current state of item `id`.
    ///
    /// A missing item is [`ReconcileError::NotFound`]. Reads never write.
    pub async fn read(&self, id: &str, opts: &CallOptions) -> Result<ResourceInstance> {
        let item = self.paths().item(id);
        self.guarded(opts, &item, Some(id), async {
            let _guard = self.reconciler.locks.lock(&item).await;
            debug!(resource = %self.resource.type_name(), %id, "Reading item");
            self.fetch(id).await
        })
        .await
    }

    /// Like [`read`](Self::read), but an item deleted out of band is `None`
    /// so callers can drop it from their state.
    pub async fn refresh(&self, id: &str, opts: &CallOptions) -> Result<Option<ResourceInstance>> {
        match self.read(id, opts).await {
            Ok(instance) => Ok(Some(instance)),
            Err(ReconcileError::NotFound { .. }) => {
                debug!(resource = %self.resource.type_name(), %id, "Item no longer exists");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
