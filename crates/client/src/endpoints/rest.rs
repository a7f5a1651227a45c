//! Collection and item endpoints of the RouterOS REST interface.
//!
//! - `GET    /rest<collection>?k=v` list, filtered by exact matches
//! - `GET    /rest<collection>/<id>` fetch one item
//! - `POST   /rest<collection>` add an item, answered with the new object
//! - `PATCH  /rest<collection>/<id>` partial update
//! - `DELETE /rest<collection>/<id>` remove

use reqwest::Response;
use serde_json::Value;

use super::{RequestContext, metric_endpoint, send_request_with_retry};
use crate::error::{ClientError, Result};
use crate::models::PropertyBag;
use crate::serde_helpers::{bag_from_json, bags_from_json};

async fn read_json(response: Response) -> Result<Option<Value>> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| ClientError::InvalidResponse(format!("invalid JSON from device: {e}")))
}

/// List a collection.
pub async fn list_items(
    ctx: RequestContext<'_>,
    collection: &str,
    filter: &[(String, String)],
) -> Result<Vec<PropertyBag>> {
    let url = ctx.url(collection);
    let builder = ctx.auth.apply(ctx.http.get(&url)).query(filter);
    let response =
        send_request_with_retry(builder, ctx.retry, collection, "GET", ctx.timeout, ctx.metrics)
            .await?;

    match read_json(response).await? {
        Some(body) => bags_from_json(body),
        None => Ok(Vec::new()),
    }
}

/// Fetch one item.
pub async fn get_item(ctx: RequestContext<'_>, item: &str) -> Result<PropertyBag> {
    let url = ctx.url(item);
    let builder = ctx.auth.apply(ctx.http.get(&url));
    let response = send_request_with_retry(
        builder,
        ctx.retry,
        metric_endpoint(item),
        "GET",
        ctx.timeout,
        ctx.metrics,
    )
    .await?;

    let body = read_json(response)
        .await?
        .ok_or_else(|| ClientError::InvalidResponse(format!("empty body for {item}")))?;
    bag_from_json(body)
}

/// Add an item to a collection.
pub async fn create_item(
    ctx: RequestContext<'_>,
    collection: &str,
    bag: &PropertyBag,
) -> Result<PropertyBag> {
    let url = ctx.url(collection);
    let builder = ctx.auth.apply(ctx.http.post(&url)).json(bag);
    let response =
        send_request_with_retry(builder, ctx.retry, collection, "POST", ctx.timeout, ctx.metrics)
            .await?;

    let body = read_json(response).await?.ok_or_else(|| {
        ClientError::InvalidResponse(format!("device returned no object for new {collection} item"))
    })?;
    bag_from_json(body)
}

/// Apply a partial update to an item.
///
/// Some firmware answers PATCH with an empty body; the sent bag is returned
/// in that case.
pub async fn update_item(
    ctx: RequestContext<'_>,
    item: &str,
    bag: &PropertyBag,
) -> Result<PropertyBag> {
    let url = ctx.url(item);
    let builder = ctx.auth.apply(ctx.http.patch(&url)).json(bag);
    let response = send_request_with_retry(
        builder,
        ctx.retry,
        metric_endpoint(item),
        "PATCH",
        ctx.timeout,
        ctx.metrics,
    )
    .await?;

    match read_json(response).await? {
        Some(body) => bag_from_json(body),
        None => Ok(bag.clone()),
    }
}

/// Remove an item.
pub async fn delete_item(ctx: RequestContext<'_>, item: &str) -> Result<()> {
    let url = ctx.url(item);
    let builder = ctx.auth.apply(ctx.http.delete(&url));
    send_request_with_retry(
        builder,
        ctx.retry,
        metric_endpoint(item),
        "DELETE",
        ctx.timeout,
        ctx.metrics,
    )
    .await?;
    Ok(())
}
