//! Nearby Aggregator: restaurants around a point, store rows first in
//! identity, provider hits filling the gaps.
//!
//! Results are cached per rounded point and radius. An entry serves a
//! request only while it is younger than the TTL and was computed for a
//! point within [`NEARBY_MOVE_INVALIDATION_MILES`] of the request.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tablescout_core::{Coordinates, PlaceCandidate, KM_PER_MILE};
use tablescout_match::thresholds::NEARBY_MOVE_INVALIDATION_MILES;
use tablescout_match::{is_duplicate, AddressBar};
use tablescout_provider::{PlacesRequest, ProximityBias};
use tracing::{debug, info, warn};

use crate::cleanup::{place_to_candidate, reparse_address};
use crate::error::{CacheError, SearchError};
use crate::gateway::{KeyValueCache, PlacesGateway, RestaurantStore};
use crate::scoring::sort_by_distance;

pub const DEFAULT_NEARBY_TTL_SECS: i64 = 900;

const NEARBY_LIMIT: u32 = 50;

/// A cached nearby result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyCacheEntry {
    pub results: Vec<PlaceCandidate>,
    pub timestamp: DateTime<Utc>,
    /// The request point, unrounded.
    pub location: Coordinates,
    pub radius_miles: f64,
}

impl NearbyCacheEntry {
    /// Young enough and computed close enough to `location`.
    #[must_use]
    pub fn is_valid_for(&self, location: &Coordinates, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp < ttl
            && self.location.distance_miles(location) < NEARBY_MOVE_INVALIDATION_MILES
    }
}

/// `nearby:<lat>:<lon>:<radius>` with coordinates rounded to 4 decimals.
#[must_use]
pub fn nearby_cache_key(location: &Coordinates, radius_miles: f64) -> String {
    format!(
        "nearby:{:.4}:{:.4}:{radius_miles}",
        location.lat, location.lon
    )
}

pub struct NearbyAggregator<G, S, C> {
    gateway: G,
    store: S,
    cache: C,
    ttl: Duration,
}

impl<G, S, C> NearbyAggregator<G, S, C>
where
    G: PlacesGateway,
    S: RestaurantStore,
    C: KeyValueCache,
{
    #[must_use]
    pub fn new(gateway: G, store: S, cache: C) -> Self {
        Self {
            gateway,
            store,
            cache,
            ttl: Duration::seconds(DEFAULT_NEARBY_TTL_SECS),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Restaurants within `radius_miles` of `location`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Store`] if the restaurant store cannot be
    /// read. Provider and cache failures are logged and absorbed.
    pub async fn fetch_nearby(
        &self,
        location: Coordinates,
        radius_miles: f64,
    ) -> Result<Vec<PlaceCandidate>, SearchError> {
        let key = nearby_cache_key(&location, radius_miles);

        if let Some(entry) = self.read_cache(&key).await {
            if entry.is_valid_for(&location, Utc::now(), self.ttl) {
                debug!(key = %key, count = entry.results.len(), "nearby cache hit");
                return Ok(entry.results);
            }
            debug!(key = %key, "nearby cache entry stale");
        }

        let request = PlacesRequest {
            limit: Some(NEARBY_LIMIT),
            bias: Some(ProximityBias { point: location }),
            ..PlacesRequest::new(location, radius_metres(radius_miles))
        };
        let (places, rows) = tokio::join!(
            self.gateway.places(&request),
            self.store.list_restaurants()
        );
        let rows = rows?;
        let places = places.unwrap_or_else(|e| {
            warn!(error = %e, "nearby provider search failed; using store rows only");
            Vec::new()
        });

        let unique_provider: Vec<PlaceCandidate> = places
            .into_iter()
            .filter_map(place_to_candidate)
            .filter(|incoming| !rows.iter().any(|row| matches_store_row(row, incoming)))
            .map(|mut candidate| {
                reparse_address(&mut candidate);
                candidate
            })
            .collect();

        let mut results: Vec<PlaceCandidate> = rows
            .into_iter()
            .filter(|row| {
                row.coordinates
                    .is_some_and(|at| at.distance_miles(&location) <= radius_miles)
            })
            .collect();
        let store_count = results.len();
        results.extend(unique_provider);
        sort_by_distance(&mut results, &location);

        info!(
            key = %key,
            store = store_count,
            provider = results.len() - store_count,
            "nearby fetch complete"
        );

        let entry = NearbyCacheEntry {
            results,
            timestamp: Utc::now(),
            location,
            radius_miles,
        };
        self.write_cache(&key, &entry).await;
        Ok(entry.results)
    }

    async fn read_cache(&self, key: &str) -> Option<NearbyCacheEntry> {
        let body = match self.cache.get(key).await {
            Ok(body) => body?,
            Err(e) => {
                warn!(key, error = %e, "nearby cache read failed; treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&body) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key, error = %e, "nearby cache entry unreadable; treating as miss");
                None
            }
        }
    }

    async fn write_cache(&self, key: &str, entry: &NearbyCacheEntry) {
        let written = match serde_json::to_string(entry) {
            Ok(body) => self.cache.set(key, body).await,
            Err(e) => Err(CacheError::from(e)),
        };
        if let Err(e) = written {
            warn!(key, error = %e, "nearby cache write failed");
        }
    }
}

/// Whether a provider hit is a store row already, by linked place id or
/// by identity resolution.
fn matches_store_row(row: &PlaceCandidate, incoming: &PlaceCandidate) -> bool {
    let linked = row.linked_place_id.is_some()
        && row.linked_place_id.as_deref() == incoming.id.provider_place_id();
    linked || is_duplicate(row, incoming, AddressBar::StoreProvider)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn radius_metres(radius_miles: f64) -> u32 {
    (radius_miles.max(0.0) * KM_PER_MILE * 1000.0).round() as u32
}

#[cfg(test)]
#[path = "nearby_test.rs"]
mod tests;
