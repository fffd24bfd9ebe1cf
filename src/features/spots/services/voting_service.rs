use std::sync::Arc;

use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::spots::dtos::VoteDirection;
use crate::features::spots::models::Spot;
use crate::features::spots::services::SpotStore;
use crate::modules::api::SpotApi;

/// Adjusts a spot's vote count by one per call
pub struct VotingService {
    api: Arc<dyn SpotApi>,
    store: Arc<SpotStore>,
}

impl VotingService {
    pub fn new(api: Arc<dyn SpotApi>, store: Arc<SpotStore>) -> Self {
        Self { api, store }
    }

    /// Send the new count and apply it locally only once the server accepted
    /// it. The server's echoed value wins over the requested one.
    pub async fn vote(&self, spot: &Spot, direction: VoteDirection) -> Result<Spot> {
        let requested = spot.voting.checked_add(direction.delta()).ok_or_else(|| {
            AppError::Validation(format!("Vote count of spot {} is out of range", spot.id))
        })?;
        debug!(
            "Voting {:?} on spot {} ({} -> {})",
            direction, spot.id, spot.voting, requested
        );

        let accepted = self
            .api
            .update_voting(&spot.id, requested)
            .await?
            .unwrap_or(requested);

        Ok(self.store.merge_voting(spot, accepted))
    }
}
