//! Presigned object-storage URLs.
//!
//! Property images live at `images/{propertyId}/{slot}.jpeg` and verification photos at
//! `verification/{requestId}/{n}.jpeg`. Clients upload and download directly against the
//! bucket with short-lived presigned URLs; the services never proxy object bytes.

#![allow(async_fn_in_trait)]

pub mod s3;

use futures::future::join_all;
use serde::Serialize;

use roofline_domain::listing::ImageSlot;

/// Issues presigned URLs for object keys.
pub trait ObjectStorage: Send + Sync {
    async fn presign_get(&self, key: &str) -> anyhow::Result<String>;
    async fn presign_put(&self, key: &str) -> anyhow::Result<String>;
}

/// Presigned GET URLs for the five image slots of a property.
///
/// A slot whose URL cannot be issued is logged and returned as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageUrls {
    pub first: Option<String>,
    pub second: Option<String>,
    pub third: Option<String>,
    pub fourth: Option<String>,
    pub fifth: Option<String>,
}

impl ImageUrls {
    fn set(&mut self, slot: ImageSlot, url: Option<String>) {
        match slot {
            ImageSlot::First => self.first = url,
            ImageSlot::Second => self.second = url,
            ImageSlot::Third => self.third = url,
            ImageSlot::Fourth => self.fourth = url,
            ImageSlot::Fifth => self.fifth = url,
        }
    }
}

/// One presigned upload target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrl {
    pub key: String,
    pub url: String,
}

/// Resolve GET URLs for keys, substituting `None` for any key that fails.
pub async fn resolve_get_urls<S: ObjectStorage>(storage: &S, keys: &[String]) -> Vec<Option<String>> {
    let results = join_all(keys.iter().map(|key| storage.presign_get(key))).await;
    results
        .into_iter()
        .zip(keys)
        .map(|(result, key)| match result {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "presign GET failed");
                None
            }
        })
        .collect()
}

/// Presigned GET URLs for every image slot of `property_id`.
pub async fn resolve_image_urls<S: ObjectStorage>(
    storage: &S,
    property_id: impl std::fmt::Display,
) -> ImageUrls {
    let keys: Vec<String> = ImageSlot::ALL
        .iter()
        .map(|slot| slot.object_key(&property_id))
        .collect();
    let urls = resolve_get_urls(storage, &keys).await;
    let mut images = ImageUrls::default();
    for (slot, url) in ImageSlot::ALL.into_iter().zip(urls) {
        images.set(slot, url);
    }
    images
}

/// Presigned PUT URLs for `keys`. Fails as a whole if any key fails.
pub async fn issue_put_urls<S: ObjectStorage>(
    storage: &S,
    keys: Vec<String>,
) -> anyhow::Result<Vec<UploadUrl>> {
    let results = join_all(keys.iter().map(|key| storage.presign_put(key))).await;
    keys.into_iter()
        .zip(results)
        .map(|(key, result)| result.map(|url| UploadUrl { key, url }))
        .collect()
}

/// Presigned PUT URLs for the five image slots of `property_id`.
pub async fn issue_image_upload_urls<S: ObjectStorage>(
    storage: &S,
    property_id: impl std::fmt::Display,
) -> anyhow::Result<Vec<UploadUrl>> {
    let keys = ImageSlot::ALL
        .iter()
        .map(|slot| slot.object_key(&property_id))
        .collect();
    issue_put_urls(storage, keys).await
}
