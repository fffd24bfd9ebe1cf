use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{debug, info};

use crate::core::error::Result;
use crate::features::spots::dtos::{CreateSpotRequest, ImageAsset, SpotDraft};
use crate::features::spots::models::{Coordinates, Spot};
use crate::features::spots::services::SpotStore;
use crate::modules::api::SpotApi;
use crate::modules::storage::ObjectStorage;
use crate::shared::validation::spot_image_key;

/// Turns a filled-in draft into a persisted spot
pub struct SubmissionService {
    api: Arc<dyn SpotApi>,
    storage: Arc<dyn ObjectStorage>,
    store: Arc<SpotStore>,
}

impl SubmissionService {
    pub fn new(
        api: Arc<dyn SpotApi>,
        storage: Arc<dyn ObjectStorage>,
        store: Arc<SpotStore>,
    ) -> Self {
        Self {
            api,
            storage,
            store,
        }
    }

    /// Validate, upload images, persist, then merge into the store.
    ///
    /// The draft is only borrowed, so on any failure it is still there for
    /// a retry and nothing has been added to the store.
    pub async fn submit(&self, draft: &SpotDraft, location: Coordinates) -> Result<Spot> {
        let (spot_type, severity) = draft.validate_required()?;

        let images = self.upload_images(&draft.images).await?;

        let request = CreateSpotRequest::new(
            location,
            spot_type,
            severity,
            draft.normalized_comment(),
            images,
            Utc::now(),
        );

        let spot = self.api.create_spot(&request).await?;
        self.store.upsert(spot.clone());

        info!(
            "Created spot {} ({}, severity {}) with {} images",
            spot.id,
            spot.spot_type,
            spot.severity,
            spot.images.len()
        );
        Ok(spot)
    }

    /// Upload all assets concurrently and resolve their URLs in input order.
    ///
    /// The first failure aborts the whole batch.
    async fn upload_images(&self, assets: &[ImageAsset]) -> Result<Vec<String>> {
        if assets.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Uploading {} images", assets.len());
        try_join_all(assets.iter().map(|asset| self.upload_image(asset))).await
    }

    async fn upload_image(&self, asset: &ImageAsset) -> Result<String> {
        let data = asset.read().await?;
        let key = spot_image_key(asset.filename());

        let key = self
            .storage
            .upload(&key, data, asset.content_type())
            .await?;

        self.storage.download_url(&key).await
    }
}
