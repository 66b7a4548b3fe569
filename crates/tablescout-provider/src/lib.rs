//! Typed client for the external places/geocoding provider.
//!
//! Speaks the Geoapify wire format: query-string requests and GeoJSON
//! `features[].properties` responses.

pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod types;

pub use client::ProviderClient;
pub use error::ProviderError;
pub use types::{
    CircleFilter, Contact, Datasource, FeatureCollection, GeocodeKind, GeocodeRequest, Place,
    PlacesRequest, ProximityBias,
};
