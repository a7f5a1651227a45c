//! Update: diff, suppress, write only what changed.

use routeros_client::{DeviceApi, PropertyBag};
use tracing::{debug, info};

use super::{CallOptions, ResourceHandle, ResourceInstance, UpdateOutcome};
use crate::diff::Diff;
use crate::error::{ReconcileError, Result};
use crate::value::Record;

impl<D: DeviceApi> ResourceHandle<'_, D> {
    /// Changes `update` would write to bring `current` to `desired`.
    ///
    /// Validates `desired`, then diffs and suppresses. Makes no device call.
    pub fn plan(&self, current: &ResourceInstance, desired: &Record) -> Result<Diff> {
        let id = current.id.as_str();
        let item = self.paths().item(id);
        self.validate(desired, &item, Some(id))?;

        Ok(Diff::compute(self.resource.schema(), &current.values, desired)
            .map_err(|e| ReconcileError::codec(&item, Some(id), e))?
            .suppress())
    }

    /// Bring item `current.id` to `desired`.
    ///
    /// `current` is the last known instance (from create, read or a previous
    /// update). Only attributes whose values differ after equivalence
    /// suppression are written. When nothing differs no device call is made
    /// and `current` is returned unchanged.
    pub async fn update(
        &self,
        current: &ResourceInstance,
        desired: &Record,
        opts: &CallOptions,
    ) -> Result<UpdateOutcome> {
        let id = current.id.as_str();
        let item = self.paths().item(id);
        let diff = self.plan(current, desired)?;

        if diff.is_empty() {
            debug!(resource = %self.resource.type_name(), %id, "No changes to apply");
            return Ok(UpdateOutcome {
                instance: current.clone(),
                written: false,
                changes: Vec::new(),
            });
        }

        let bag = write_payload(&diff);
        self.guarded(opts, &item, Some(id), async {
            let _guard = self.reconciler.locks.lock(&item).await;
            info!(
                resource = %self.resource.type_name(),
                %id,
                changes = diff.len(),
                "Updating item"
            );
            self.device()
                .update(&item, &bag)
                .await
                .map_err(|e| ReconcileError::from_device(&item, Some(id), e))?;

            let instance = self.fetch(id).await?;
            Ok(UpdateOutcome {
                instance,
                written: true,
                changes: diff.changes().to_vec(),
            })
        })
        .await
    }
}

/// Partial bag holding only changed keys. Removals are written as empty
/// strings, which the device treats as "unset".
fn write_payload(diff: &Diff) -> PropertyBag {
    diff.changes()
        .iter()
        .map(|change| {
            (
                change.device_key.clone(),
                change.desired.clone().unwrap_or_default(),
            )
        })
        .collect()
}
