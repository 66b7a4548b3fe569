//! Provider request and response types.
//!
//! Requests render to Geoapify query parameters; responses are GeoJSON
//! feature collections whose `properties` become [`Place`] values.

use serde::Deserialize;
use tablescout_core::{AddressParts, Coordinates, Passthrough, PlaceCandidate, PlaceId};
use tablescout_match::normalize;

/// Data source name used by the provider for crowd-sourced map data. Hits
/// from any other source are treated as authoritative.
const CROWD_SOURCED: &str = "openstreetmap";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Result type restriction for a geocode search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeKind {
    Country,
    State,
    City,
    Postcode,
    Street,
    Amenity,
}

impl GeocodeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GeocodeKind::Country => "country",
            GeocodeKind::State => "state",
            GeocodeKind::City => "city",
            GeocodeKind::Postcode => "postcode",
            GeocodeKind::Street => "street",
            GeocodeKind::Amenity => "amenity",
        }
    }
}

/// Restrict results to a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleFilter {
    pub center: Coordinates,
    pub radius_m: u32,
}

impl CircleFilter {
    /// `circle:lon,lat,radius_m`
    #[must_use]
    pub fn to_param(&self) -> String {
        format!(
            "circle:{},{},{}",
            self.center.lon, self.center.lat, self.radius_m
        )
    }
}

/// Prefer results near a point without excluding others.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityBias {
    pub point: Coordinates,
}

impl ProximityBias {
    /// `proximity:lon,lat`
    #[must_use]
    pub fn to_param(&self) -> String {
        format!("proximity:{},{}", self.point.lon, self.point.lat)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeRequest {
    pub text: String,
    pub kind: Option<GeocodeKind>,
    pub limit: Option<u32>,
    pub filter: Option<CircleFilter>,
    pub bias: Option<ProximityBias>,
}

impl GeocodeRequest {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: None,
            limit: None,
            filter: None,
            bias: None,
        }
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("text", self.text.clone())];
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.as_str().to_owned()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.to_param()));
        }
        if let Some(bias) = &self.bias {
            pairs.push(("bias", bias.to_param()));
        }
        pairs.push(("format", "geojson".to_owned()));
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacesRequest {
    pub center: Coordinates,
    pub radius_m: u32,
    /// Provider category ids; empty means every catering venue.
    pub categories: Vec<String>,
    pub name: Option<String>,
    pub limit: Option<u32>,
    pub bias: Option<ProximityBias>,
}

impl PlacesRequest {
    #[must_use]
    pub fn new(center: Coordinates, radius_m: u32) -> Self {
        Self {
            center,
            radius_m,
            categories: Vec::new(),
            name: None,
            limit: None,
            bias: None,
        }
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let categories = if self.categories.is_empty() {
            "catering".to_owned()
        } else {
            self.categories.join(",")
        };
        let filter = CircleFilter {
            center: self.center,
            radius_m: self.radius_m,
        };

        let mut pairs = vec![("categories", categories), ("filter", filter.to_param())];
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(bias) = &self.bias {
            pairs.push(("bias", bias.to_param()));
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// GeoJSON body. A missing or `null` `features` array is zero results.
#[derive(Debug, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
}

impl FeatureCollection {
    #[must_use]
    pub fn into_places(self) -> Vec<Place> {
        self.features
            .unwrap_or_default()
            .into_iter()
            .map(|f| f.properties)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Place,
}

/// One provider result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Place {
    pub place_id: Option<String>,
    pub name: Option<String>,
    /// First display line; for venues this is usually the venue name.
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub formatted: Option<String>,
    pub housenumber: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub website: Option<String>,
    pub contact: Option<Contact>,
    pub datasource: Option<Datasource>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Contact {
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Datasource {
    pub sourcename: Option<String>,
}

impl Place {
    /// Hits from a non-crowd-sourced geocoder were already matched against
    /// the query upstream.
    #[must_use]
    pub fn is_authoritative(&self) -> bool {
        self.datasource
            .as_ref()
            .and_then(|d| d.sourcename.as_deref())
            .is_some_and(|name| !name.eq_ignore_ascii_case(CROWD_SOURCED))
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)).filter(Coordinates::is_valid),
            _ => None,
        }
    }

    /// Street line from `housenumber` + `street`, when the provider split it.
    #[must_use]
    pub fn structured_street(&self) -> Option<String> {
        match (self.housenumber.as_deref(), self.street.as_deref()) {
            (Some(number), Some(street)) => Some(format!("{number} {street}")),
            (None, Some(street)) => Some(street.to_owned()),
            _ => None,
        }
    }

    /// Display name, falling back to the first address line. A name with
    /// nothing left after normalization counts as missing.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        let usable = |n: &&str| !normalize(n).is_empty();
        self.name
            .as_deref()
            .map(str::trim)
            .filter(usable)
            .or_else(|| self.address_line1.as_deref().map(str::trim).filter(usable))
    }

    /// Convert into a candidate, taking the address as the provider gave
    /// it. `None` without a place id or a name.
    #[must_use]
    pub fn into_candidate(self) -> Option<PlaceCandidate> {
        let place_id = self.place_id.clone().filter(|id| !id.trim().is_empty())?;
        let name = self.display_name()?.to_owned();
        let coordinates = self.coordinates();
        let street = self.structured_street().or(self.address_line1);

        Some(PlaceCandidate {
            id: PlaceId::Provider(place_id),
            name,
            address: AddressParts {
                street,
                city: self.city,
                state: self.state,
                postal_code: self.postcode,
                country: self.country,
                formatted: self.formatted,
            },
            coordinates,
            passthrough: Passthrough {
                website: self.website,
                phone: self.contact.and_then(|c| c.phone),
                categories: self.categories,
            },
            linked_place_id: None,
        })
    }
}
