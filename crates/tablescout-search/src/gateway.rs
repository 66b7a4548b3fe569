//! Collaborator seams: the provider, the restaurant store and the
//! key-value cache.
//!
//! Search and nearby logic is generic over these traits so tests can run
//! against in-memory fakes.

use std::future::Future;

use sqlx::PgPool;
use tablescout_core::PlaceCandidate;
use tablescout_db::{DbError, RestaurantRow};
use tablescout_provider::{GeocodeRequest, Place, PlacesRequest, ProviderClient, ProviderError};

use crate::error::CacheError;

/// Places and geocoding lookups.
pub trait PlacesGateway: Send + Sync {
    fn geocode(
        &self,
        request: &GeocodeRequest,
    ) -> impl Future<Output = Result<Vec<Place>, ProviderError>> + Send;

    fn places(
        &self,
        request: &PlacesRequest,
    ) -> impl Future<Output = Result<Vec<Place>, ProviderError>> + Send;

    fn place_details(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<Place, ProviderError>> + Send;
}

/// Read access to the local restaurant store.
pub trait RestaurantStore: Send + Sync {
    /// Every usable row, unfiltered.
    fn list_restaurants(&self) -> impl Future<Output = Result<Vec<PlaceCandidate>, DbError>> + Send;

    /// Rows recorded against a provider place id.
    fn find_by_place_id(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<Vec<PlaceCandidate>, DbError>> + Send;
}

/// String-keyed store of JSON blobs.
pub trait KeyValueCache: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, CacheError>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), CacheError>> + Send;
}

impl PlacesGateway for ProviderClient {
    async fn geocode(&self, request: &GeocodeRequest) -> Result<Vec<Place>, ProviderError> {
        ProviderClient::geocode(self, request).await
    }

    async fn places(&self, request: &PlacesRequest) -> Result<Vec<Place>, ProviderError> {
        ProviderClient::places(self, request).await
    }

    async fn place_details(&self, place_id: &str) -> Result<Place, ProviderError> {
        ProviderClient::place_details(self, place_id).await
    }
}

/// Postgres-backed [`RestaurantStore`].
#[derive(Debug, Clone)]
pub struct PgRestaurantStore {
    pool: PgPool,
}

impl PgRestaurantStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RestaurantStore for PgRestaurantStore {
    async fn list_restaurants(&self) -> Result<Vec<PlaceCandidate>, DbError> {
        let rows = tablescout_db::list_restaurants(&self.pool).await?;
        Ok(rows_into_candidates(rows))
    }

    async fn find_by_place_id(&self, place_id: &str) -> Result<Vec<PlaceCandidate>, DbError> {
        let rows = tablescout_db::find_restaurants_by_place_id(&self.pool, place_id).await?;
        Ok(rows_into_candidates(rows))
    }
}

/// Convert rows, skipping any without an id or name.
fn rows_into_candidates(rows: Vec<RestaurantRow>) -> Vec<PlaceCandidate> {
    let total = rows.len();
    let candidates: Vec<PlaceCandidate> = rows
        .into_iter()
        .filter_map(RestaurantRow::into_candidate)
        .collect();
    let skipped = total - candidates.len();
    if skipped > 0 {
        tracing::warn!(skipped, total, "skipped restaurant rows missing id or name");
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn malformed_rows_are_skipped() {
        let good = RestaurantRow {
            id: Some(Uuid::nil()),
            name: Some("Cafe Luna".to_string()),
            ..RestaurantRow::default()
        };
        let nameless = RestaurantRow {
            id: Some(Uuid::nil()),
            ..RestaurantRow::default()
        };
        let idless = RestaurantRow {
            name: Some("Ghost Kitchen".to_string()),
            ..RestaurantRow::default()
        };

        let candidates = rows_into_candidates(vec![good, nameless, idless]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Cafe Luna");
    }
}
