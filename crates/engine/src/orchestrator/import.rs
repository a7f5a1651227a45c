//! Import: adopt an existing item by device id or natural key.

use routeros_client::{ClientError, DeviceApi};
use tracing::info;

use super::{CallOptions, ResourceHandle, ResourceInstance};
use crate::error::{ReconcileError, Result};
use crate::path::{Lookup, identifier_of, is_device_id};
use crate::schema::IdKind;

impl<D: DeviceApi> ResourceHandle<'_, D> {
    /// Resolve `token` to an existing item and return its full state.
    ///
    /// Tokens shaped like device ids (`*1A`) are read directly. Anything
    /// else is matched against the natural key; zero matches is
    /// `NotFound`, more than one is `AmbiguousKey`.
    pub async fn import(&self, token: &str, opts: &CallOptions) -> Result<ResourceInstance> {
        let token = token.trim();
        let collection = self.resource.path();

        if self.resource.identifier_kind() == IdKind::Name || is_device_id(token) {
            return self.read(token, opts).await;
        }

        let not_found = || ReconcileError::NotFound {
            path: collection.to_string(),
            id: Some(token.to_string()),
        };
        let Some(key) = self.resource.natural_key_attribute() else {
            return Err(not_found());
        };

        self.guarded(opts, collection, None, async {
            let filter = vec![(key.key().to_string(), token.to_string())];
            let items = self
                .device()
                .list(collection, &filter)
                .await
                .map_err(|e| ReconcileError::from_device(collection, None, e))?;

            match Lookup::from_matches(items, key.key(), token) {
                Lookup::None => Err(not_found()),
                Lookup::Many(count) => Err(ReconcileError::AmbiguousKey {
                    path: collection.to_string(),
                    id: None,
                    key: key.name().to_string(),
                    value: token.to_string(),
                    count,
                }),
                Lookup::One(bag) => {
                    let id = identifier_of(self.resource, &bag).ok_or_else(|| {
                        ReconcileError::Device {
                            path: collection.to_string(),
                            id: None,
                            source: ClientError::InvalidResponse(format!(
                                "item with {}={token:?} has no identifier",
                                key.name()
                            )),
                        }
                    })?;
                    info!(resource = %self.resource.type_name(), %id, token, "Imported item");
                    self.instance(&id, &bag)
                }
            }
        })
        .await
    }
}
