//! Identity resolution: do two records describe the same restaurant?
//!
//! There is no key shared between the store and the provider, so identity
//! is decided by name and address similarity. The decision favours missing
//! a true duplicate over merging two different places.
//!
//! [`similarity`] is asymmetric. Every call site passes the record that is
//! already kept (a store row, or the provider hit seen first) as `existing`
//! and the record under test as `incoming`.

use tablescout_core::PlaceCandidate;

use crate::normalize::similarity;
use crate::thresholds::{
    NAME_FAST_REJECT, NAME_ONLY, PROVIDER_PROVIDER_ADDRESS, STORE_PROVIDER_ADDRESS,
    STORE_ROW_ADDRESS, STORE_ROW_NAME,
};

/// Address similarity bar, chosen by call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressBar {
    /// Loosened "duplicate of any store row" lookup.
    StoreRow,
    /// Provider hit against a store record.
    StoreProvider,
    /// Provider hit against another provider hit.
    ProviderProvider,
}

impl AddressBar {
    /// Exclusive lower bound on address similarity.
    #[must_use]
    pub fn threshold(self) -> u8 {
        match self {
            AddressBar::StoreRow => STORE_ROW_ADDRESS,
            AddressBar::StoreProvider => STORE_PROVIDER_ADDRESS,
            AddressBar::ProviderProvider => PROVIDER_PROVIDER_ADDRESS,
        }
    }
}

/// Whether `incoming` duplicates `existing`.
///
/// Names must score at least 95. With an address on both sides the
/// address score must clear `bar`; otherwise only a name score above 98
/// counts.
#[must_use]
pub fn is_duplicate(existing: &PlaceCandidate, incoming: &PlaceCandidate, bar: AddressBar) -> bool {
    let name_score = similarity(&existing.name, &incoming.name);
    if name_score < NAME_FAST_REJECT {
        return false;
    }
    decide_on_address(existing, incoming, name_score, bar)
}

/// Looser check used when asking "is this already in the store?".
///
/// An exact provider place-id match on the row wins outright. Otherwise the
/// name bar drops to 80 and the address bar to 65.
#[must_use]
pub fn is_duplicate_of_store_row(row: &PlaceCandidate, incoming: &PlaceCandidate) -> bool {
    if let (Some(linked), Some(place_id)) =
        (row.linked_place_id.as_deref(), incoming.id.provider_place_id())
    {
        if linked == place_id {
            return true;
        }
    }

    let name_score = similarity(&row.name, &incoming.name);
    if name_score < STORE_ROW_NAME {
        return false;
    }
    decide_on_address(row, incoming, name_score, AddressBar::StoreRow)
}

fn decide_on_address(
    existing: &PlaceCandidate,
    incoming: &PlaceCandidate,
    name_score: u8,
    bar: AddressBar,
) -> bool {
    match (existing.address.comparable(), incoming.address.comparable()) {
        (Some(kept), Some(other)) => similarity(&kept, &other) > bar.threshold(),
        _ => name_score > NAME_ONLY,
    }
}
