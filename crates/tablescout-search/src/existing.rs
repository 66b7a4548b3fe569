//! "Is this place already in the store?" lookup, used before importing a
//! provider hit.

use tablescout_core::PlaceCandidate;
use tablescout_match::is_duplicate_of_store_row;
use tracing::debug;

use crate::error::SearchError;
use crate::gateway::RestaurantStore;

/// The store row that `candidate` duplicates, if any.
///
/// A recorded provider place id matching the candidate wins outright.
/// Otherwise every row is compared with the loosened store-row check.
///
/// # Errors
///
/// Returns [`SearchError::Store`] if the store cannot be read.
pub async fn find_existing_restaurant<S: RestaurantStore>(
    store: &S,
    candidate: &PlaceCandidate,
) -> Result<Option<PlaceCandidate>, SearchError> {
    if let Some(place_id) = candidate.id.provider_place_id() {
        if let Some(row) = store.find_by_place_id(place_id).await?.into_iter().next() {
            debug!(place_id, "existing restaurant found by place id");
            return Ok(Some(row));
        }
    }

    let rows = store.list_restaurants().await?;
    Ok(rows
        .into_iter()
        .find(|row| is_duplicate_of_store_row(row, candidate)))
}
