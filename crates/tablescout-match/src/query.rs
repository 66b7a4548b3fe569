//! Business-name / location segmentation of a search phrase.
//!
//! The heuristics lean towards assuming a trailing location: any query of
//! two or more words without a connector or comma is split, with the last
//! word(s) taken as the place. Ranking downstream depends on this exact
//! split, so a business with a multi-word name searched on its own is
//! expected to be partly misread as a location.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Locative connectors, matched with surrounding spaces on the normalized
/// query.
const CONNECTORS: &[&str] = &[" in ", " at ", " near ", " on ", " by ", " around "];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Business,
    BusinessLocationProposal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub kind: QueryKind,
    pub business_name: String,
    pub location: Option<String>,
}

impl QueryAnalysis {
    fn business(name: String) -> Self {
        Self {
            kind: QueryKind::Business,
            business_name: name,
            location: None,
        }
    }

    fn proposal(name: String, location: String) -> Self {
        Self {
            kind: QueryKind::BusinessLocationProposal,
            business_name: name,
            location: Some(location),
        }
    }
}

/// Split `query` into a business-name fragment and an optional location.
///
/// Order of precedence: a single locative connector, then the last comma in
/// the raw query, then word count (more than two words: all but the last two
/// / last two; two words: one / one; one word: business only).
#[must_use]
pub fn analyze(query: &str) -> QueryAnalysis {
    let normalized = normalize(query);

    if let Some((business, location)) = split_on_connector(&normalized) {
        return QueryAnalysis::proposal(business, location);
    }

    if let Some((before, after)) = query.rsplit_once(',') {
        let business = normalize(before);
        let location = normalize(after);
        if !business.is_empty() && !location.is_empty() {
            return QueryAnalysis::proposal(business, location);
        }
    }

    let words: Vec<&str> = normalized.split_whitespace().collect();
    match words.len() {
        0 | 1 => QueryAnalysis::business(normalized),
        2 => QueryAnalysis::proposal(words[0].to_string(), words[1].to_string()),
        n => QueryAnalysis::proposal(words[..n - 2].join(" "), words[n - 2..].join(" ")),
    }
}

/// Split on the only connector occurrence that leaves both halves
/// non-empty; `None` when there are zero or several such occurrences.
fn split_on_connector(normalized: &str) -> Option<(String, String)> {
    let padded = format!(" {normalized} ");
    let padded = padded.as_str();
    let mut splits = CONNECTORS.iter().flat_map(|&connector| {
        padded.match_indices(connector).filter_map(move |(idx, _)| {
            let business = padded[..idx].trim();
            let location = padded[idx + connector.len()..].trim();
            (!business.is_empty() && !location.is_empty()).then_some((business, location))
        })
    });

    let (business, location) = splits.next()?;
    if splits.next().is_some() {
        return None;
    }
    Some((business.to_string(), location.to_string()))
}
