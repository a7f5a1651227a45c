//! The device collaborator seam used by the reconciliation engine.
//!
//! Paths are RouterOS menu paths such as `/routing/bgp/template` (a
//! collection) or `/routing/bgp/template/*2` (an item). Item segments are
//! expected to be percent-encoded already.

use std::future::Future;

use crate::error::Result;
use crate::models::PropertyBag;

/// Collection/item operations on a RouterOS-style device.
///
/// Implementations must be shareable across tasks; the engine holds one
/// instance behind an `Arc` and issues calls for different items
/// concurrently.
pub trait DeviceApi: Send + Sync {
    /// List a collection, optionally filtered by exact property matches.
    fn list(
        &self,
        collection: &str,
        filter: &[(String, String)],
    ) -> impl Future<Output = Result<Vec<PropertyBag>>> + Send;

    /// Fetch one item. A missing item is `ClientError::NotFound`.
    fn get(&self, item: &str) -> impl Future<Output = Result<PropertyBag>> + Send;

    /// Add an item to a collection, returning the device's view of it
    /// (including its `.id`).
    fn create(
        &self,
        collection: &str,
        bag: &PropertyBag,
    ) -> impl Future<Output = Result<PropertyBag>> + Send;

    /// Apply a partial change to an existing item.
    fn update(
        &self,
        item: &str,
        bag: &PropertyBag,
    ) -> impl Future<Output = Result<PropertyBag>> + Send;

    /// Remove an item. A missing item is `ClientError::NotFound`.
    fn delete(&self, item: &str) -> impl Future<Output = Result<()>> + Send;
}
