//! Place candidate value types shared by the matching and search crates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinates;

/// Identity of a candidate.
///
/// Store rows carry a stable UUID; provider hits carry the provider's place
/// identifier, valid only for the current session or cache window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "id", rename_all = "snake_case")]
pub enum PlaceId {
    Store(Uuid),
    Provider(String),
}

impl PlaceId {
    /// Flat key for list rendering. Never collides across the two spaces.
    #[must_use]
    pub fn render_key(&self) -> String {
        match self {
            PlaceId::Store(id) => format!("store:{id}"),
            PlaceId::Provider(id) => format!("provider:{id}"),
        }
    }

    #[must_use]
    pub fn provider_place_id(&self) -> Option<&str> {
        match self {
            PlaceId::Provider(id) => Some(id.as_str()),
            PlaceId::Store(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Store,
    Provider,
}

/// Structured address. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressParts {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    /// Provider- or store-formatted single-line address, when available.
    pub formatted: Option<String>,
}

impl AddressParts {
    /// Address string used for identity comparison.
    ///
    /// Prefers the formatted address; falls back to `street, city`.
    #[must_use]
    pub fn comparable(&self) -> Option<String> {
        if let Some(formatted) = non_blank(self.formatted.as_deref()) {
            return Some(formatted.to_string());
        }
        let parts: Vec<&str> = [self.street.as_deref(), self.city.as_deref()]
            .into_iter()
            .filter_map(non_blank)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Count of populated structured fields; used to keep the richer of two
    /// duplicate records.
    #[must_use]
    pub fn richness(&self) -> usize {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
            &self.formatted,
        ]
        .into_iter()
        .filter(|field| non_blank(field.as_deref()).is_some())
        .count()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Opaque fields passed through to presentation code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Passthrough {
    pub website: Option<String>,
    pub phone: Option<String>,
    pub categories: Vec<String>,
}

/// A provisional search hit from either the store or the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub id: PlaceId,
    pub name: String,
    pub address: AddressParts,
    pub coordinates: Option<Coordinates>,
    pub passthrough: Passthrough,
    /// Provider place id recorded on a store row, if it was imported from
    /// the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_place_id: Option<String>,
}

impl PlaceCandidate {
    /// A candidate with no address, coordinates or passthrough data.
    #[must_use]
    pub fn new(id: PlaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: AddressParts::default(),
            coordinates: None,
            passthrough: Passthrough::default(),
            linked_place_id: None,
        }
    }

    #[must_use]
    pub fn source(&self) -> Source {
        match self.id {
            PlaceId::Store(_) => Source::Store,
            PlaceId::Provider(_) => Source::Provider,
        }
    }

    #[must_use]
    pub fn is_store(&self) -> bool {
        self.source() == Source::Store
    }

    /// Distance to `point` in kilometres, `None` when coordinates are unknown.
    #[must_use]
    pub fn distance_km_to(&self, point: &Coordinates) -> Option<f64> {
        self.coordinates.map(|c| c.distance_km(point))
    }
}

/// A candidate annotated with ranking metadata. Created per search and
/// discarded once ordering is done.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: PlaceCandidate,
    /// 0–100 similarity of the name to the query.
    pub name_similarity: u8,
    pub relevance_score: f64,
}

impl ScoredCandidate {
    #[must_use]
    pub fn into_candidate(self) -> PlaceCandidate {
        self.candidate
    }
}
