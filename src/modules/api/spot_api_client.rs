//! REST client for the spots backend
//!
//! Talks to the `/api/spots` collection and per-resource endpoints and
//! translates transport and HTTP failures into `AppError::Persist`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::core::config::ApiConfig;
use crate::core::error::{AppError, Result};
use crate::features::spots::dtos::{CreateSpotRequest, UpdateVotingDto};
use crate::features::spots::models::Spot;
use crate::shared::constants::SPOTS_PATH;

/// Backend operations on spots
#[async_trait]
pub trait SpotApi: Send + Sync {
    /// `GET /api/spots`
    async fn list_spots(&self) -> Result<Vec<Spot>>;

    /// `POST /api/spots`
    async fn create_spot(&self, request: &CreateSpotRequest) -> Result<Spot>;

    /// `GET /api/spots/{id}`
    async fn get_spot(&self, id: &str) -> Result<Spot>;

    /// `PATCH /api/spots/{id}` with `{voting}`.
    ///
    /// Returns the voting value echoed by the server, if it sent one.
    async fn update_voting(&self, id: &str, voting: i64) -> Result<Option<i64>>;
}

/// Source of a bearer token for authenticated requests
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// `None` when nobody is signed in
    async fn access_token(&self) -> Option<String>;
}

pub struct SpotApiClient {
    http_client: Client,
    base_url: String,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
}

impl SpotApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_provider: None,
        })
    }

    /// Attach `Authorization: Bearer` whenever the provider has a token
    pub fn with_token_provider(mut self, provider: Arc<dyn AccessTokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, SPOTS_PATH)
    }

    fn resource_url(&self, id: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            SPOTS_PATH,
            urlencoding::encode(id)
        )
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token_provider {
            Some(provider) => match provider.access_token().await {
                Some(token) => request.bearer_auth(token),
                None => request,
            },
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = self
            .authorize(request)
            .await
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("Failed to {}: {}", action, e);
                AppError::Persist(format!("Failed to {}: {}", action, e))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("Spots API error while trying to {}: HTTP {} - {}", action, status, body);

        if status.as_u16() == 404 {
            return Err(AppError::Persist(format!("Not found while trying to {}", action)));
        }

        Err(AppError::Persist(format!(
            "Spots API error: HTTP {}",
            status
        )))
    }

    async fn parse<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse response to {}: {}", action, e);
            AppError::Persist(format!("Failed to parse response to {}: {}", action, e))
        })
    }
}

#[async_trait]
impl SpotApi for SpotApiClient {
    async fn list_spots(&self) -> Result<Vec<Spot>> {
        let url = self.collection_url();
        debug!("Fetching spots from {}", url);

        let response = self.send(self.http_client.get(&url), "list spots").await?;
        let spots: Vec<Spot> = Self::parse(response, "list spots").await?;

        debug!("Fetched {} spots", spots.len());
        Ok(spots)
    }

    async fn create_spot(&self, request: &CreateSpotRequest) -> Result<Spot> {
        let url = self.collection_url();
        debug!(
            "Creating {} spot at [{}, {}]",
            request.properties.spot_type,
            request.geometry.coordinates.longitude,
            request.geometry.coordinates.latitude
        );

        let response = self
            .send(self.http_client.post(&url).json(request), "create spot")
            .await?;

        Self::parse(response, "create spot").await
    }

    async fn get_spot(&self, id: &str) -> Result<Spot> {
        let url = self.resource_url(id);
        debug!("Fetching spot {}", id);

        let response = self.send(self.http_client.get(&url), "fetch spot").await?;
        Self::parse(response, "fetch spot").await
    }

    async fn update_voting(&self, id: &str, voting: i64) -> Result<Option<i64>> {
        let url = self.resource_url(id);
        debug!("Updating voting of spot {} to {}", id, voting);

        let response = self
            .send(
                self.http_client.patch(&url).json(&UpdateVotingDto { voting }),
                "update voting",
            )
            .await?;

        // Some backends answer 204 or echo only part of the record
        let body = response.text().await.unwrap_or_default();
        Ok(accepted_voting(&body))
    }
}

/// Extract the voting value from a PATCH response body.
///
/// Accepts `{"voting": n}` as well as a full Feature with
/// `properties.voting`.
pub fn accepted_voting(body: &str) -> Option<i64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    value
        .get("voting")
        .and_then(serde_json::Value::as_i64)
        .or_else(|| {
            value
                .get("properties")
                .and_then(|p| p.get("voting"))
                .and_then(serde_json::Value::as_i64)
        })
}
