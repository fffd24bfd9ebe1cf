use std::sync::Arc;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::features::auth::{IdentityProvider, IdentityToolkitClient, SessionService};
use crate::features::spots::models::Coordinates;
use crate::features::spots::{SpotStore, SubmissionService, VotingService};
use crate::modules::api::{SpotApi, SpotApiClient};
use crate::modules::geolocation::{Geolocator, PositionSource, StaticPositionSource};
use crate::modules::storage::{MinIOClient, ObjectStorage};

/// Shared services for one running client
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionService>,
    pub store: Arc<SpotStore>,
    pub submissions: Arc<SubmissionService>,
    pub voting: Arc<VotingService>,
    pub geolocator: Arc<Geolocator>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(IdentityToolkitClient::new(config.identity.clone()));
        let session = Arc::new(SessionService::new(
            identity,
            config.identity.refresh_margin,
        ));
        tracing::info!("Session service initialized");

        let api: Arc<dyn SpotApi> = Arc::new(
            SpotApiClient::new(&config.api)?.with_token_provider(session.clone()),
        );
        tracing::info!("Spots API client initialized for {}", config.api.base_url);

        let storage: Arc<dyn ObjectStorage> = Arc::new(MinIOClient::new(config.storage.clone())?);

        let position_source: Arc<dyn PositionSource> =
            Arc::new(StaticPositionSource::new(Coordinates::new(
                config.geolocation.default_longitude,
                config.geolocation.default_latitude,
            )));

        Ok(Self::new(
            api,
            storage,
            session,
            Geolocator::new(position_source, &config.geolocation),
        ))
    }

    /// Wire the spot services around already built collaborators
    pub fn new(
        api: Arc<dyn SpotApi>,
        storage: Arc<dyn ObjectStorage>,
        session: Arc<SessionService>,
        geolocator: Geolocator,
    ) -> Self {
        let store = Arc::new(SpotStore::new(api.clone()));
        let submissions = Arc::new(SubmissionService::new(
            api.clone(),
            storage,
            store.clone(),
        ));
        let voting = Arc::new(VotingService::new(api, store.clone()));

        Self {
            session,
            store,
            submissions,
            voting,
            geolocator: Arc::new(geolocator),
        }
    }
}
