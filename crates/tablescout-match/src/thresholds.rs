//! Matching and ranking thresholds.
//!
//! These values define observable merge and ranking behaviour. Changing any
//! of them changes which records are merged and how results are ordered;
//! the regression tests in `dedup` and the search crate pin them.

/// Minimum store-row name similarity (exclusive) to become a search match.
pub const STORE_MATCH_NAME: u8 = 60;

/// Address similarity bar (exclusive) for the loosened "any store row" check.
pub const STORE_ROW_ADDRESS: u8 = 65;

/// Address similarity bar (exclusive) for store-vs-provider merges.
pub const STORE_PROVIDER_ADDRESS: u8 = 70;

/// Name similarity bar (inclusive) for the loosened "any store row" check.
pub const STORE_ROW_NAME: u8 = 80;

/// Address similarity bar (exclusive) for provider-vs-provider dedup.
pub const PROVIDER_PROVIDER_ADDRESS: u8 = 80;

/// A provider address line this similar (exclusive) to the name is an echo
/// of the name, not an address.
pub const ADDRESS_ECHOES_NAME: u8 = 90;

/// Name similarity below this is never a duplicate.
pub const NAME_FAST_REJECT: u8 = 95;

/// Name-only bar (exclusive) when either side lacks an address.
pub const NAME_ONLY: u8 = 98;

/// Fraction of query tokens that must appear in a non-authoritative
/// provider result's name.
pub const QUERY_TOKEN_COVERAGE: f64 = 0.8;

/// Relevance bonus for store-originated candidates.
pub const STORE_BONUS: f64 = 10.0;

/// Relevance bonus when the candidate's address mentions the query location.
pub const LOCATION_MENTION_BONUS: f64 = 30.0;

/// Distance at or below which no penalty applies.
pub const DISTANCE_FREE_KM: f64 = 5.0;

/// Distance at which the penalty reaches its cap.
pub const DISTANCE_CAP_KM: f64 = 40.0;

/// Maximum relevance points lost to distance.
pub const DISTANCE_MAX_PENALTY: f64 = 20.0;

/// Provider search radius used by every search strategy.
pub const SEARCH_RADIUS_KM: f64 = 80.0;

/// Nearby cache entries are invalid once the query point moves this far.
pub const NEARBY_MOVE_INVALIDATION_MILES: f64 = 0.31;

/// Linear distance penalty: 0 up to [`DISTANCE_FREE_KM`], rising to
/// [`DISTANCE_MAX_PENALTY`] at [`DISTANCE_CAP_KM`] and flat beyond.
#[must_use]
pub fn distance_penalty(distance_km: f64) -> f64 {
    if !distance_km.is_finite() || distance_km <= DISTANCE_FREE_KM {
        return 0.0;
    }
    let span = DISTANCE_CAP_KM - DISTANCE_FREE_KM;
    let scaled = (distance_km - DISTANCE_FREE_KM) / span * DISTANCE_MAX_PENALTY;
    scaled.min(DISTANCE_MAX_PENALTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_have_contract_values() {
        assert_eq!(STORE_MATCH_NAME, 60);
        assert_eq!(STORE_ROW_ADDRESS, 65);
        assert_eq!(STORE_PROVIDER_ADDRESS, 70);
        assert_eq!(STORE_ROW_NAME, 80);
        assert_eq!(PROVIDER_PROVIDER_ADDRESS, 80);
        assert_eq!(ADDRESS_ECHOES_NAME, 90);
        assert_eq!(NAME_FAST_REJECT, 95);
        assert_eq!(NAME_ONLY, 98);
    }

    #[test]
    fn no_penalty_within_free_radius() {
        assert!(distance_penalty(0.0).abs() < f64::EPSILON);
        assert!(distance_penalty(5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn penalty_scales_linearly() {
        // Halfway between 5 and 40 km loses half the cap.
        assert!((distance_penalty(22.5) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn penalty_is_capped() {
        assert!((distance_penalty(40.0) - 20.0).abs() < 1e-9);
        assert!((distance_penalty(500.0) - 20.0).abs() < 1e-9);
    }
}
