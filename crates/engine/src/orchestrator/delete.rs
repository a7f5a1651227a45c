//! Delete: idempotent removal.

use routeros_client::DeviceApi;
use tracing::{debug, info};

use super::{CallOptions, ResourceHandle};
use crate::error::{ReconcileError, Result};

impl<D: DeviceApi> ResourceHandle<'_, D> {
    /// Remove item `id`. An item that is already gone counts as deleted.
    pub async fn delete(&self, id: &str, opts: &CallOptions) -> Result<()> {
        let item = self.paths().item(id);
        self.guarded(opts, &item, Some(id), async {
            let _guard = self.reconciler.locks.lock(&item).await;
            match self.device().delete(&item).await {
                Ok(()) => {
                    info!(resource = %self.resource.type_name(), %id, "Deleted item");
                    Ok(())
                }
                Err(e) if e.root_cause().is_not_found() => {
                    debug!(resource = %self.resource.type_name(), %id, "Item already absent");
                    Ok(())
                }
                Err(e) => Err(ReconcileError::from_device(&item, Some(id), e)),
            }
        })
        .await
    }
}
