//! Testing utilities for engine tests.
//!
//! Available when running tests or when the `test-utils` feature is enabled.
//!
//! [`InMemoryDevice`] behaves like a RouterOS REST collection store: it
//! assigns `*<hex>` identifiers, merges device-side defaults into new items,
//! treats empty strings in updates as "unset" and answers missing items
//! with `ClientError::NotFound`. Every call is recorded so tests can assert
//! on the exact device traffic.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use percent_encoding::percent_decode_str;
use routeros_client::models::ID_KEY;
use routeros_client::{ClientError, DeviceApi, PropertyBag};

/// One call received by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    List { collection: String },
    Get { item: String },
    Create { collection: String, bag: PropertyBag },
    Update { item: String, bag: PropertyBag },
    Delete { item: String },
}

impl DeviceCall {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::Create { .. } | Self::Update { .. } | Self::Delete { .. }
        )
    }
}

#[derive(Debug)]
struct State {
    next_id: u64,
    collections: BTreeMap<String, Vec<PropertyBag>>,
    defaults: BTreeMap<String, PropertyBag>,
    calls: Vec<DeviceCall>,
    fail_next_write: Option<(u16, String)>,
}

/// In-memory stand-in for a RouterOS device.
#[derive(Debug)]
pub struct InMemoryDevice {
    state: Mutex<State>,
    latency: Option<Duration>,
}

impl Default for InMemoryDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a property bag from key/value pairs.
pub fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl InMemoryDevice {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                collections: BTreeMap::new(),
                defaults: BTreeMap::new(),
                calls: Vec::new(),
                fail_next_write: None,
            }),
            latency: None,
        }
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Properties the device fills in on create (e.g. `routing-table`).
    pub fn with_defaults(self, collection: &str, pairs: &[(&str, &str)]) -> Self {
        self.lock().defaults.insert(collection.to_string(), bag(pairs));
        self
    }

    /// Add an item without recording a call. Returns its `.id`.
    pub fn seed(&self, collection: &str, pairs: &[(&str, &str)]) -> String {
        let mut state = self.lock();
        let id = state.allocate_id();
        let mut item = bag(pairs);
        item.insert(ID_KEY.to_string(), id.clone());
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(item);
        id
    }

    /// Current properties of an item.
    pub fn item(&self, item: &str) -> Option<PropertyBag> {
        let state = self.lock();
        state.find(item).map(|(collection, index)| state.collections[collection][index].clone())
    }

    /// Change a property out of band.
    pub fn set_property(&self, item: &str, key: &str, value: &str) -> bool {
        let mut state = self.lock();
        match state.find(item).map(|(c, i)| (c.to_string(), i)) {
            Some((collection, index)) => {
                if let Some(items) = state.collections.get_mut(&collection) {
                    items[index].insert(key.to_string(), value.to_string());
                }
                true
            }
            None => false,
        }
    }

    /// Delete an item out of band.
    pub fn remove(&self, item: &str) -> bool {
        let mut state = self.lock();
        state.remove(item)
    }

    /// Fail the next create/update/delete with an API error.
    pub fn fail_next_write(&self, status: u16, message: &str) {
        self.lock().fail_next_write = Some((status, message.to_string()));
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.lock().calls.clone()
    }

    pub fn writes(&self) -> Vec<DeviceCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.is_write())
            .cloned()
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.lock().calls.iter().filter(|call| call.is_write()).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl State {
    fn allocate_id(&mut self) -> String {
        let id = format!("*{:X}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Locate an item path as (collection, index). The last segment matches
    /// either `.id` or `name`.
    fn find(&self, item: &str) -> Option<(&str, usize)> {
        let (collection, segment) = item.rsplit_once('/')?;
        let segment = percent_decode_str(segment).decode_utf8().ok()?;
        let items = self.collections.get(collection)?;
        let index = items.iter().position(|bag| {
            bag.get(ID_KEY).is_some_and(|id| *id == segment)
                || bag.get("name").is_some_and(|name| *name == segment)
        })?;
        let (collection, _) = self.collections.get_key_value(collection)?;
        Some((collection.as_str(), index))
    }

    fn remove(&mut self, item: &str) -> bool {
        let Some((collection, index)) = self.find(item).map(|(c, i)| (c.to_string(), i)) else {
            return false;
        };
        if let Some(items) = self.collections.get_mut(&collection) {
            items.remove(index);
        }
        true
    }

    fn take_failure(&mut self, path: &str) -> Result<(), ClientError> {
        match self.fail_next_write.take() {
            Some((status, message)) => Err(ClientError::ApiError {
                status,
                url: format!("/rest{path}"),
                message,
                detail: None,
            }),
            None => Ok(()),
        }
    }
}

fn not_found(path: &str) -> ClientError {
    ClientError::NotFound(format!("/rest{path}"))
}

impl DeviceApi for InMemoryDevice {
    async fn list(
        &self,
        collection: &str,
        filter: &[(String, String)],
    ) -> routeros_client::Result<Vec<PropertyBag>> {
        self.delay().await;
        let mut state = self.lock();
        state.calls.push(DeviceCall::List {
            collection: collection.to_string(),
        });
        Ok(state
            .collections
            .get(collection)
            .map(|items| {
                items
                    .iter()
                    .filter(|bag| filter.iter().all(|(k, v)| bag.get(k) == Some(v)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, item: &str) -> routeros_client::Result<PropertyBag> {
        self.delay().await;
        let mut state = self.lock();
        state.calls.push(DeviceCall::Get {
            item: item.to_string(),
        });
        let (collection, index) = state.find(item).ok_or_else(|| not_found(item))?;
        Ok(state.collections[collection][index].clone())
    }

    async fn create(
        &self,
        collection: &str,
        bag: &PropertyBag,
    ) -> routeros_client::Result<PropertyBag> {
        self.delay().await;
        let mut state = self.lock();
        state.calls.push(DeviceCall::Create {
            collection: collection.to_string(),
            bag: bag.clone(),
        });
        state.take_failure(collection)?;

        let mut item = state.defaults.get(collection).cloned().unwrap_or_default();
        item.extend(
            bag.iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        let id = state.allocate_id();
        item.insert(ID_KEY.to_string(), id);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(item.clone());
        Ok(item)
    }

    async fn update(&self, item: &str, bag: &PropertyBag) -> routeros_client::Result<PropertyBag> {
        self.delay().await;
        let mut state = self.lock();
        state.calls.push(DeviceCall::Update {
            item: item.to_string(),
            bag: bag.clone(),
        });
        state.take_failure(item)?;

        let (collection, index) = state
            .find(item)
            .map(|(c, i)| (c.to_string(), i))
            .ok_or_else(|| not_found(item))?;
        let stored = state
            .collections
            .get_mut(&collection)
            .and_then(|items| items.get_mut(index))
            .ok_or_else(|| not_found(item))?;
        for (key, value) in bag {
            if value.is_empty() {
                stored.remove(key);
            } else {
                stored.insert(key.clone(), value.clone());
            }
        }
        Ok(stored.clone())
    }

    async fn delete(&self, item: &str) -> routeros_client::Result<()> {
        self.delay().await;
        let mut state = self.lock();
        state.calls.push(DeviceCall::Delete {
            item: item.to_string(),
        });
        state.take_failure(item)?;
        if state.remove(item) {
            Ok(())
        } else {
            Err(not_found(item))
        }
    }
}
