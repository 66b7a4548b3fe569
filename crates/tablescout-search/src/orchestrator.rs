//! Search Orchestrator.
//!
//! One search fans out to several provider strategies and a full read of
//! the local store, all awaited together. Provider hits are cleaned, checked
//! against the store rows that match the query, deduplicated among
//! themselves and ranked alongside those rows.
//!
//! At most one search is live per orchestrator. Each search takes a new
//! generation number; a search that finds the counter has moved on by the
//! time its I/O completes returns [`SearchError::Superseded`] instead of a
//! result.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tablescout_core::{Coordinates, PlaceCandidate, ScoredCandidate};
use tablescout_match::thresholds::{SEARCH_RADIUS_KM, STORE_MATCH_NAME};
use tablescout_match::{analyze, is_duplicate, normalize, AddressBar, QueryAnalysis, QueryKind};
use tablescout_provider::{
    CircleFilter, GeocodeKind, GeocodeRequest, Place, PlacesRequest, ProviderError, ProximityBias,
};
use tracing::{debug, info, warn};

use crate::cleanup::clean_place;
use crate::error::SearchError;
use crate::gateway::{PlacesGateway, RestaurantStore};
use crate::scoring::{covers_query_tokens, sort_by_relevance, ScoringContext};

/// Per-call result cap sent to the provider.
const RESULT_LIMIT: u32 = 20;

/// Session cache key: the normalized query and the exact user position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SessionKey {
    query: String,
    user: Option<(u64, u64)>,
}

impl SessionKey {
    fn new(normalized_query: &str, user: Option<Coordinates>) -> Self {
        Self {
            query: normalized_query.to_owned(),
            user: user.map(|c| (c.lat.to_bits(), c.lon.to_bits())),
        }
    }
}

/// Provider hits for one search, plus the geocoded point of the location
/// the query mentioned, if any.
#[derive(Debug, Default)]
struct ProviderHits {
    places: Vec<Place>,
    location_point: Option<Coordinates>,
}

pub struct SearchOrchestrator<G, S> {
    gateway: G,
    store: S,
    generation: AtomicU64,
    session: Mutex<HashMap<SessionKey, Vec<ScoredCandidate>>>,
}

impl<G, S> SearchOrchestrator<G, S>
where
    G: PlacesGateway,
    S: RestaurantStore,
{
    #[must_use]
    pub fn new(gateway: G, store: S) -> Self {
        Self {
            gateway,
            store,
            generation: AtomicU64::new(0),
            session: Mutex::new(HashMap::new()),
        }
    }

    /// Ranked candidates for `query`, best first.
    ///
    /// # Errors
    ///
    /// See [`SearchOrchestrator::search_scored`].
    pub async fn search(
        &self,
        query: &str,
        user: Option<Coordinates>,
    ) -> Result<Vec<PlaceCandidate>, SearchError> {
        let scored = self.search_scored(query, user).await?;
        Ok(scored
            .into_iter()
            .map(ScoredCandidate::into_candidate)
            .collect())
    }

    /// Ranked candidates with their scores.
    ///
    /// A blank query yields no results. Repeating a query with the same user
    /// position returns the session copy without any I/O.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Store`] when the restaurant store cannot be
    /// read, and [`SearchError::Superseded`] when another search started on
    /// this orchestrator before this one finished. Provider failures are
    /// logged and never returned.
    pub async fn search_scored(
        &self,
        query: &str,
        user: Option<Coordinates>,
    ) -> Result<Vec<ScoredCandidate>, SearchError> {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        let key = SessionKey::new(&normalized, user);
        if let Some(cached) = self.lock_session().get(&key).cloned() {
            debug!(query = %normalized, count = cached.len(), "session cache hit");
            return Ok(cached);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let analysis = analyze(query);

        let (hits, rows) = tokio::join!(
            self.provider_hits(&analysis, query, &normalized, user),
            self.store.list_restaurants()
        );

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(query = %normalized, generation, "search superseded");
            return Err(SearchError::Superseded);
        }
        let rows = rows?;

        let context = ScoringContext {
            normalized_query: normalized.clone(),
            business_name: analysis.business_name,
            location: analysis.location,
            reference: hits.location_point.or(user),
        };
        let results = rank(&context, rows, hits.places);

        info!(query = %normalized, count = results.len(), "search complete");
        self.lock_session().insert(key, results.clone());
        Ok(results)
    }

    /// Forget every cached search of this session.
    pub fn reset(&self) {
        self.lock_session().clear();
    }

    fn lock_session(&self) -> MutexGuard<'_, HashMap<SessionKey, Vec<ScoredCandidate>>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn provider_hits(
        &self,
        analysis: &QueryAnalysis,
        query: &str,
        normalized: &str,
        user: Option<Coordinates>,
    ) -> ProviderHits {
        match (analysis.kind, analysis.location.as_deref()) {
            (QueryKind::BusinessLocationProposal, Some(location)) => {
                let (around, whole) = tokio::join!(
                    self.around_location(&analysis.business_name, location),
                    self.whole_query(query, user)
                );
                let mut places = around.places;
                places.extend(whole);
                ProviderHits {
                    places: dedup_by_place_id(places),
                    location_point: around.location_point,
                }
            }
            _ => ProviderHits {
                places: self.business_only(query, normalized, user).await,
                location_point: None,
            },
        }
    }

    /// Geocode the location fragment, then look for the business around it.
    async fn around_location(&self, business: &str, location: &str) -> ProviderHits {
        let request = GeocodeRequest {
            limit: Some(1),
            ..GeocodeRequest::new(location)
        };
        let located = absorb("locate", self.gateway.geocode(&request).await);
        let Some(point) = located.iter().find_map(Place::coordinates) else {
            debug!(location, "location fragment did not geocode");
            return ProviderHits::default();
        };

        let bias = Some(ProximityBias { point });
        let places_request = PlacesRequest {
            name: Some(business.to_owned()),
            limit: Some(RESULT_LIMIT),
            bias,
            ..PlacesRequest::new(point, search_radius_m())
        };
        let amenity_request = GeocodeRequest {
            kind: Some(GeocodeKind::Amenity),
            limit: Some(RESULT_LIMIT),
            filter: Some(CircleFilter {
                center: point,
                radius_m: search_radius_m(),
            }),
            bias,
            ..GeocodeRequest::new(business)
        };

        let (nearby, amenities) = tokio::join!(
            self.gateway.places(&places_request),
            self.gateway.geocode(&amenity_request)
        );
        let mut places = absorb("location_places", nearby);
        places.extend(absorb("location_amenity", amenities));
        ProviderHits {
            places,
            location_point: Some(point),
        }
    }

    /// Text search for the whole query, kept near the user when known.
    async fn whole_query(&self, query: &str, user: Option<Coordinates>) -> Vec<Place> {
        let request = GeocodeRequest {
            limit: Some(RESULT_LIMIT),
            filter: user.map(|center| CircleFilter {
                center,
                radius_m: search_radius_m(),
            }),
            ..GeocodeRequest::new(query)
        };
        absorb("whole_query", self.gateway.geocode(&request).await)
    }

    /// Business-only query: radius search around the user, an amenity text
    /// search and an unrestricted text search. Crowd-sourced hits must cover
    /// the query tokens.
    async fn business_only(
        &self,
        query: &str,
        normalized: &str,
        user: Option<Coordinates>,
    ) -> Vec<Place> {
        let bias = user.map(|point| ProximityBias { point });
        let amenity_request = GeocodeRequest {
            kind: Some(GeocodeKind::Amenity),
            limit: Some(RESULT_LIMIT),
            bias,
            ..GeocodeRequest::new(query)
        };
        let broad_request = GeocodeRequest {
            limit: Some(RESULT_LIMIT),
            bias,
            ..GeocodeRequest::new(query)
        };

        let (around_user, amenities, broad) = tokio::join!(
            self.around_user(normalized, user),
            self.gateway.geocode(&amenity_request),
            self.gateway.geocode(&broad_request)
        );

        let mut places = around_user;
        places.extend(absorb("amenity", amenities));
        places.extend(absorb("broad", broad));

        dedup_by_place_id(places)
            .into_iter()
            .filter(|place| {
                place.is_authoritative()
                    || place
                        .display_name()
                        .is_some_and(|name| covers_query_tokens(name, normalized))
            })
            .collect()
    }

    async fn around_user(&self, name: &str, user: Option<Coordinates>) -> Vec<Place> {
        let Some(point) = user else {
            return Vec::new();
        };
        let request = PlacesRequest {
            name: Some(name.to_owned()),
            limit: Some(RESULT_LIMIT),
            bias: Some(ProximityBias { point }),
            ..PlacesRequest::new(point, search_radius_m())
        };
        absorb("around_user", self.gateway.places(&request).await)
    }
}

/// Identity resolution and ranking over one search's inputs.
fn rank(
    context: &ScoringContext,
    rows: Vec<PlaceCandidate>,
    places: Vec<Place>,
) -> Vec<ScoredCandidate> {
    let store_matches: Vec<ScoredCandidate> = rows
        .into_iter()
        .map(|row| context.score(row))
        .filter(|scored| scored.name_similarity > STORE_MATCH_NAME)
        .collect();

    let provider: Vec<PlaceCandidate> = places
        .into_iter()
        .filter_map(clean_place)
        .filter(|incoming| {
            !store_matches
                .iter()
                .any(|kept| is_duplicate(&kept.candidate, incoming, AddressBar::StoreProvider))
        })
        .collect();
    let provider = dedup_provider(provider);

    debug!(
        store = store_matches.len(),
        provider = provider.len(),
        "identity resolution complete"
    );

    let mut results = store_matches;
    results.extend(provider.into_iter().map(|candidate| context.score(candidate)));
    sort_by_relevance(&mut results);
    results
}

/// Collapse provider duplicates, keeping whichever record has the richer
/// address.
fn dedup_provider(candidates: Vec<PlaceCandidate>) -> Vec<PlaceCandidate> {
    let mut kept: Vec<PlaceCandidate> = Vec::with_capacity(candidates.len());
    for incoming in candidates {
        let existing = kept
            .iter_mut()
            .find(|existing| is_duplicate(existing, &incoming, AddressBar::ProviderProvider));
        match existing {
            Some(existing) => {
                if incoming.address.richness() > existing.address.richness() {
                    *existing = incoming;
                }
            }
            None => kept.push(incoming),
        }
    }
    kept
}

/// First hit per provider place id, in arrival order. Hits without an id
/// are dropped.
fn dedup_by_place_id(places: Vec<Place>) -> Vec<Place> {
    let mut seen = HashSet::new();
    places
        .into_iter()
        .filter(|place| {
            place
                .place_id
                .as_deref()
                .is_some_and(|id| seen.insert(id.to_owned()))
        })
        .collect()
}

/// A failed strategy contributes nothing.
fn absorb(strategy: &str, result: Result<Vec<Place>, ProviderError>) -> Vec<Place> {
    match result {
        Ok(places) => {
            debug!(strategy, count = places.len(), "strategy complete");
            places
        }
        Err(e) => {
            warn!(strategy, error = %e, "provider strategy failed; continuing without it");
            Vec::new()
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn search_radius_m() -> u32 {
    (SEARCH_RADIUS_KM * 1000.0).round() as u32
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
