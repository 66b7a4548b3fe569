//! Relevance scoring and ordering of merged search results.

use std::cmp::Ordering;

use tablescout_core::{Coordinates, PlaceCandidate, ScoredCandidate};
use tablescout_match::{normalize, similarity};
use tablescout_match::thresholds::{
    distance_penalty, LOCATION_MENTION_BONUS, QUERY_TOKEN_COVERAGE, STORE_BONUS,
};

/// Per-search inputs shared by every candidate's score.
#[derive(Debug, Clone)]
pub(crate) struct ScoringContext {
    pub normalized_query: String,
    pub business_name: String,
    pub location: Option<String>,
    /// Geocoded point of the mentioned location, else the user's position.
    pub reference: Option<Coordinates>,
}

impl ScoringContext {
    /// Best of the name against the whole query and against the business
    /// fragment.
    pub fn name_similarity(&self, name: &str) -> u8 {
        similarity(name, &self.normalized_query).max(similarity(name, &self.business_name))
    }

    pub fn score(&self, candidate: PlaceCandidate) -> ScoredCandidate {
        let name_similarity = self.name_similarity(&candidate.name);
        let relevance_score = self.relevance(&candidate, name_similarity);
        ScoredCandidate {
            candidate,
            name_similarity,
            relevance_score,
        }
    }

    fn relevance(&self, candidate: &PlaceCandidate, name_similarity: u8) -> f64 {
        let mut score = f64::from(name_similarity);
        if candidate.is_store() {
            score += STORE_BONUS;
        }
        if self
            .location
            .as_deref()
            .is_some_and(|location| mentions_location(candidate, location))
        {
            score += LOCATION_MENTION_BONUS;
        }
        if let Some(km) = self
            .reference
            .as_ref()
            .and_then(|point| candidate.distance_km_to(point))
        {
            score -= distance_penalty(km);
        }
        score
    }
}

/// Whether the candidate's city, state or formatted address textually
/// matches `location`, on whole tokens in either direction.
pub(crate) fn mentions_location(candidate: &PlaceCandidate, location: &str) -> bool {
    let needle = padded(&normalize(location));
    if needle.trim().is_empty() {
        return false;
    }

    let address = &candidate.address;
    [
        address.city.as_deref(),
        address.state.as_deref(),
        address.formatted.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(|field| padded(&normalize(field)))
    .filter(|field| !field.trim().is_empty())
    .any(|field| field.contains(&needle) || needle.contains(&field))
}

/// Whether at least 80% of the query's tokens appear in `name`, each as a
/// substring of a name token or containing one.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn covers_query_tokens(name: &str, normalized_query: &str) -> bool {
    let query_tokens: Vec<&str> = normalized_query.split_whitespace().collect();
    if query_tokens.is_empty() {
        return true;
    }

    let normalized_name = normalize(name);
    let name_tokens: Vec<&str> = normalized_name.split_whitespace().collect();
    let matched = query_tokens
        .iter()
        .filter(|q| {
            name_tokens
                .iter()
                .any(|n| n.contains(**q) || q.contains(*n))
        })
        .count();

    matched as f64 / query_tokens.len() as f64 >= QUERY_TOKEN_COVERAGE
}

/// Highest relevance first. Ties keep their incoming order.
pub(crate) fn sort_by_relevance(results: &mut [ScoredCandidate]) {
    results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
}

/// Nearest first; candidates without coordinates go last.
pub(crate) fn sort_by_distance(results: &mut [PlaceCandidate], point: &Coordinates) {
    results.sort_by(|a, b| match (a.distance_km_to(point), b.distance_km_to(point)) {
        (Some(da), Some(db)) => da.total_cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn padded(text: &str) -> String {
    format!(" {text} ")
}
