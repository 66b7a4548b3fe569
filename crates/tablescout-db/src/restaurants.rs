//! Read queries for the `restaurants` table.
//!
//! The store is the identity ground truth for search: every row keeps its
//! UUID across sessions. Rows are read unfiltered or by provider place id.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tablescout_core::{AddressParts, Coordinates, Passthrough, PlaceCandidate, PlaceId};
use tablescout_match::normalize;
use uuid::Uuid;

const SELECT_COLUMNS: &str = "SELECT id, name, address, city, state, zip_code, country, \
            formatted_address, latitude, longitude, place_id, website, phone, categories \
     FROM restaurants";

/// A row from the `restaurants` table.
///
/// `id` and `name` are nullable in the row type so that a malformed row is
/// skipped by [`RestaurantRow::into_candidate`] instead of failing the whole
/// read.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct RestaurantRow {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    /// Street line.
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub formatted_address: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    /// Provider place id the row was imported from, if any.
    pub place_id: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl RestaurantRow {
    /// `None` when the row lacks an id or a name that survives
    /// normalization.
    #[must_use]
    pub fn into_candidate(self) -> Option<PlaceCandidate> {
        let id = self.id?;
        let name = self.name.filter(|n| !normalize(n).is_empty())?;
        let coordinates = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => lat
                .to_f64()
                .zip(lon.to_f64())
                .map(|(lat, lon)| Coordinates::new(lat, lon))
                .filter(Coordinates::is_valid),
            _ => None,
        };

        Some(PlaceCandidate {
            id: PlaceId::Store(id),
            name,
            address: AddressParts {
                street: self.address,
                city: self.city,
                state: self.state,
                postal_code: self.zip_code,
                country: self.country,
                formatted: self.formatted_address,
            },
            coordinates,
            passthrough: Passthrough {
                website: self.website,
                phone: self.phone,
                categories: self.categories.unwrap_or_default(),
            },
            linked_place_id: self.place_id.filter(|p| !p.trim().is_empty()),
        })
    }
}

/// All restaurant rows, unfiltered, ordered by name.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_restaurants(pool: &PgPool) -> Result<Vec<RestaurantRow>, sqlx::Error> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY name");
    sqlx::query_as::<_, RestaurantRow>(&sql)
        .fetch_all(pool)
        .await
}

/// Rows whose recorded provider place id equals `place_id`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn find_restaurants_by_place_id(
    pool: &PgPool,
    place_id: &str,
) -> Result<Vec<RestaurantRow>, sqlx::Error> {
    let sql = format!("{SELECT_COLUMNS} WHERE place_id = $1");
    sqlx::query_as::<_, RestaurantRow>(&sql)
        .bind(place_id)
        .fetch_all(pool)
        .await
}
