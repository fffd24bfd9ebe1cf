use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::core::config::GeolocationConfig;
use crate::core::error::{AppError, Result};
use crate::features::spots::models::Coordinates;

/// Device position provider
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Position source that always reports the same coordinate
pub struct StaticPositionSource {
    position: Coordinates,
}

impl StaticPositionSource {
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

#[async_trait]
impl PositionSource for StaticPositionSource {
    async fn current_position(&self) -> Result<Coordinates> {
        Ok(self.position)
    }
}

/// Last known fix with the time it was taken
struct CachedFix {
    position: Coordinates,
    taken_at: Instant,
}

/// Resolves the current position, reusing a recent fix when allowed
pub struct Geolocator {
    source: Arc<dyn PositionSource>,
    cache: RwLock<Option<CachedFix>>,
    maximum_age: Duration,
    timeout: Duration,
}

impl Geolocator {
    pub fn new(source: Arc<dyn PositionSource>, config: &GeolocationConfig) -> Self {
        Self {
            source,
            cache: RwLock::new(None),
            maximum_age: config.maximum_age,
            timeout: config.timeout,
        }
    }

    /// Current position: the cached fix if it is at most `maximum_age` old,
    /// otherwise a fresh fix bounded by `timeout`.
    pub async fn current_position(&self) -> Result<Coordinates> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                let age = cached.taken_at.elapsed();
                if age <= self.maximum_age {
                    debug!("Using cached position fix ({} ms old)", age.as_millis());
                    return Ok(cached.position);
                }
            }
        }

        let position = tokio::time::timeout(self.timeout, self.source.current_position())
            .await
            .map_err(|_| {
                warn!(
                    "No position fix within {} ms",
                    self.timeout.as_millis()
                );
                AppError::Geolocation(format!(
                    "No position fix within {} ms",
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| match e {
                AppError::Geolocation(_) => e,
                other => AppError::Geolocation(other.to_string()),
            })?;

        let mut cache = self.cache.write().await;
        *cache = Some(CachedFix {
            position,
            taken_at: Instant::now(),
        });

        Ok(position)
    }
}
