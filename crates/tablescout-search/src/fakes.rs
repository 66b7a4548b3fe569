//! In-memory collaborators for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tablescout_core::{Coordinates, PlaceCandidate, PlaceId};
use tablescout_db::DbError;
use tablescout_provider::{GeocodeRequest, Place, PlacesRequest, ProviderError};
use uuid::Uuid;

use crate::error::CacheError;
use crate::gateway::{KeyValueCache, PlacesGateway, RestaurantStore};

/// Canned provider. Location lookups (`limit == 1`) answer with
/// `location`; other geocodes with `geocode`; radius searches with
/// `places`.
#[derive(Default)]
pub(crate) struct FakeGateway {
    pub location: Vec<Place>,
    pub geocode: Vec<Place>,
    pub places: Vec<Place>,
    pub fail_geocode: bool,
    pub fail_places: bool,
    /// Geocode texts containing this word wait before answering.
    pub slow_word: Option<&'static str>,
    pub geocode_calls: AtomicUsize,
    pub places_calls: AtomicUsize,
    pub geocode_requests: Mutex<Vec<GeocodeRequest>>,
    pub places_requests: Mutex<Vec<PlacesRequest>>,
}

impl FakeGateway {
    pub fn calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst) + self.places_calls.load(Ordering::SeqCst)
    }
}

fn upstream_error(endpoint: &str) -> ProviderError {
    ProviderError::UnexpectedStatus {
        status: 503,
        endpoint: endpoint.to_string(),
    }
}

impl PlacesGateway for FakeGateway {
    async fn geocode(&self, request: &GeocodeRequest) -> Result<Vec<Place>, ProviderError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        self.geocode_requests
            .lock()
            .unwrap()
            .push(request.clone());
        if self
            .slow_word
            .is_some_and(|word| request.text.contains(word))
        {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if self.fail_geocode {
            return Err(upstream_error("v1/geocode/search"));
        }
        if request.limit == Some(1) {
            Ok(self.location.clone())
        } else {
            Ok(self.geocode.clone())
        }
    }

    async fn places(&self, request: &PlacesRequest) -> Result<Vec<Place>, ProviderError> {
        self.places_calls.fetch_add(1, Ordering::SeqCst);
        self.places_requests.lock().unwrap().push(request.clone());
        if self.fail_places {
            return Err(upstream_error("v2/places"));
        }
        Ok(self.places.clone())
    }

    async fn place_details(&self, place_id: &str) -> Result<Place, ProviderError> {
        self.places
            .iter()
            .chain(&self.geocode)
            .find(|p| p.place_id.as_deref() == Some(place_id))
            .cloned()
            .ok_or_else(|| ProviderError::NoDetails {
                place_id: place_id.to_string(),
            })
    }
}

#[derive(Default)]
pub(crate) struct FakeStore {
    pub rows: Vec<PlaceCandidate>,
    pub fail: bool,
    pub list_calls: AtomicUsize,
}

impl FakeStore {
    pub fn with_rows(rows: Vec<PlaceCandidate>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl RestaurantStore for FakeStore {
    async fn list_restaurants(&self) -> Result<Vec<PlaceCandidate>, DbError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(self.rows.clone())
    }

    async fn find_by_place_id(&self, place_id: &str) -> Result<Vec<PlaceCandidate>, DbError> {
        if self.fail {
            return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .rows
            .iter()
            .filter(|row| row.linked_place_id.as_deref() == Some(place_id))
            .cloned()
            .collect())
    }
}

/// Cache whose reads and writes always fail with an I/O error.
#[derive(Default)]
pub(crate) struct BrokenCache {
    pub get_calls: AtomicUsize,
    pub set_calls: AtomicUsize,
}

fn cache_fault() -> CacheError {
    CacheError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "cache unavailable",
    ))
}

impl KeyValueCache for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Err(cache_fault())
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), CacheError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        Err(cache_fault())
    }
}

pub(crate) fn store_row(name: &str, street: Option<&str>, at: Option<Coordinates>) -> PlaceCandidate {
    let mut row = PlaceCandidate::new(PlaceId::Store(Uuid::new_v4()), name);
    row.address.street = street.map(str::to_string);
    row.coordinates = at;
    row
}

pub(crate) fn provider_place(id: &str, name: &str, line1: Option<&str>, at: Option<Coordinates>) -> Place {
    Place {
        place_id: Some(id.to_string()),
        name: Some(name.to_string()),
        address_line1: line1.map(str::to_string),
        lat: at.map(|c| c.lat),
        lon: at.map(|c| c.lon),
        ..Place::default()
    }
}
