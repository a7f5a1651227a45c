//! [`DeviceApi`] implementation for [`RouterOsClient`].

use tracing::debug;

use crate::api::DeviceApi;
use crate::client::RouterOsClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::PropertyBag;

impl DeviceApi for RouterOsClient {
    async fn list(&self, collection: &str, filter: &[(String, String)]) -> Result<Vec<PropertyBag>> {
        let _slot = self.slot().await?;
        debug!(%collection, filter_len = filter.len(), "listing collection");
        endpoints::list_items(self.context(), collection, filter).await
    }

    async fn get(&self, item: &str) -> Result<PropertyBag> {
        let _slot = self.slot().await?;
        debug!(%item, "fetching item");
        endpoints::get_item(self.context(), item).await
    }

    async fn create(&self, collection: &str, bag: &PropertyBag) -> Result<PropertyBag> {
        let _slot = self.slot().await?;
        debug!(%collection, keys = bag.len(), "creating item");
        endpoints::create_item(self.context(), collection, bag).await
    }

    async fn update(&self, item: &str, bag: &PropertyBag) -> Result<PropertyBag> {
        let _slot = self.slot().await?;
        debug!(%item, keys = bag.len(), "updating item");
        endpoints::update_item(self.context(), item, bag).await
    }

    async fn delete(&self, item: &str) -> Result<()> {
        let _slot = self.slot().await?;
        debug!(%item, "deleting item");
        endpoints::delete_item(self.context(), item).await
    }
}
