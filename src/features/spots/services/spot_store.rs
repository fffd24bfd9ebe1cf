use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::error::Result;
use crate::features::spots::models::Spot;
use crate::modules::api::SpotApi;

/// In-memory collection of the spots visible to the current view.
///
/// Mutations go through `replace_all`, `upsert` and `merge_voting` only.
/// Each one is a single `send_modify`, so subscribers never observe a
/// half-applied change.
pub struct SpotStore {
    api: Arc<dyn SpotApi>,
    spots: watch::Sender<Vec<Spot>>,
}

impl SpotStore {
    pub fn new(api: Arc<dyn SpotApi>) -> Self {
        let (spots, _) = watch::channel(Vec::new());
        Self { api, spots }
    }

    /// Fetch all spots and replace the collection, keeping server order.
    ///
    /// On failure the held collection is left as it was. Overlapping calls
    /// are not fenced: whichever response arrives last wins.
    pub async fn load(&self) -> Result<usize> {
        let spots = self.api.list_spots().await?;
        let count = spots.len();
        self.replace_all(spots);

        debug!("Loaded {} spots", count);
        Ok(count)
    }

    /// `load` for background refreshes: failures are logged and stale data
    /// stays visible.
    pub async fn refresh_in_background(&self) {
        if let Err(e) = self.load().await {
            warn!("Background spot refresh failed, keeping {} cached spots: {}", self.len(), e);
        }
    }

    /// Fetch one spot by id and merge it into the collection
    pub async fn refresh_one(&self, id: &str) -> Result<Spot> {
        let spot = self.api.get_spot(id).await?;
        self.upsert(spot.clone());
        Ok(spot)
    }

    pub fn replace_all(&self, spots: Vec<Spot>) {
        self.spots.send_modify(|held| *held = spots);
    }

    /// Insert when the id is unknown, otherwise replace the entry in place
    pub fn upsert(&self, spot: Spot) {
        self.spots.send_modify(|held| {
            match held.iter_mut().find(|existing| existing.id == spot.id) {
                Some(existing) => *existing = spot,
                None => held.push(spot),
            }
        });
    }

    /// Set `voting` on the held copy of `spot`, leaving every other field as
    /// held. Inserts `spot` with the new value when it is not held.
    pub fn merge_voting(&self, spot: &Spot, voting: i64) -> Spot {
        let mut merged = Spot {
            voting,
            ..spot.clone()
        };

        self.spots.send_modify(|held| {
            match held.iter_mut().find(|existing| existing.id == spot.id) {
                Some(existing) => {
                    existing.voting = voting;
                    merged = existing.clone();
                }
                None => held.push(merged.clone()),
            }
        });

        info!("Spot {} voting is now {}", spot.id, voting);
        merged
    }

    pub fn snapshot(&self) -> Vec<Spot> {
        self.spots.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<Spot> {
        self.spots.borrow().iter().find(|s| s.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.spots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.borrow().is_empty()
    }

    /// Receiver notified after every mutation
    pub fn subscribe(&self) -> watch::Receiver<Vec<Spot>> {
        self.spots.subscribe()
    }
}
