//! Store rows serving a dish, cuisine or meal, matched through the synonym
//! and category dictionaries.

use std::collections::BTreeSet;

use tablescout_core::{Coordinates, PlaceCandidate};
use tablescout_match::{category_terms, is_category_term, normalize, related_terms};
use tracing::debug;

use crate::error::SearchError;
use crate::gateway::RestaurantStore;
use crate::scoring::sort_by_distance;

/// Expanded vocabulary for a dish term. Category members are expanded
/// through the synonym table as well.
#[must_use]
pub fn expand_dish_term(term: &str) -> BTreeSet<String> {
    let mut terms = related_terms(term);
    if is_category_term(term) {
        for member in category_terms(term) {
            terms.extend(related_terms(&member));
        }
    }
    terms
}

/// Store rows whose name or categories mention `term` or anything it
/// expands to. Nearest first when `user` is known, otherwise by name.
///
/// # Errors
///
/// Returns [`SearchError::Store`] if the store cannot be read.
pub async fn dish_search<S: RestaurantStore>(
    store: &S,
    term: &str,
    user: Option<Coordinates>,
) -> Result<Vec<PlaceCandidate>, SearchError> {
    let terms: Vec<String> = expand_dish_term(term)
        .into_iter()
        .map(|t| format!(" {t} "))
        .collect();
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    let mut matches: Vec<PlaceCandidate> = store
        .list_restaurants()
        .await?
        .into_iter()
        .filter(|row| serves_any(row, &terms))
        .collect();

    matches.sort_by_cached_key(|row| row.name.to_lowercase());
    if let Some(point) = user {
        // Stable: equal distances stay in name order.
        sort_by_distance(&mut matches, &point);
    }

    debug!(term, expanded = terms.len(), count = matches.len(), "dish search complete");
    Ok(matches)
}

/// `padded_terms` are normalized and wrapped in single spaces so they only
/// match whole words.
fn serves_any(row: &PlaceCandidate, padded_terms: &[String]) -> bool {
    std::iter::once(row.name.as_str())
        .chain(row.passthrough.categories.iter().map(String::as_str))
        .map(|text| format!(" {} ", normalize(text)))
        .any(|haystack| padded_terms.iter().any(|t| haystack.contains(t.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{store_row, FakeStore};

    fn names(results: &[PlaceCandidate]) -> Vec<&str> {
        results.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn synonyms_match_names() {
        let store = FakeStore::with_rows(vec![
            store_row("Zeppelin Pizzeria", None, None),
            store_row("Flatbread Co", None, None),
            store_row("Burger Barn", None, None),
        ]);

        let results = dish_search(&store, "pizza", None).await.unwrap();
        assert_eq!(names(&results), ["Flatbread Co", "Zeppelin Pizzeria"]);
    }

    #[tokio::test]
    async fn categories_are_searched_too() {
        let mut deli = store_row("Mario's", None, None);
        deli.passthrough.categories = vec!["catering.restaurant.pizza".to_string()];
        let store = FakeStore::with_rows(vec![deli]);

        let results = dish_search(&store, "pizzas", None).await.unwrap();
        assert_eq!(names(&results), ["Mario's"]);
    }

    #[tokio::test]
    async fn cuisine_expands_to_its_dishes() {
        let store = FakeStore::with_rows(vec![
            store_row("Taqueria Sol", None, None),
            store_row("Tony's Italian Kitchen", None, None),
            store_row("Quesadilla Queen", None, None),
        ]);

        let results = dish_search(&store, "Mexican", None).await.unwrap();
        assert_eq!(names(&results), ["Quesadilla Queen", "Taqueria Sol"]);
    }

    #[tokio::test]
    async fn nearest_first_when_user_known() {
        let here = Coordinates::new(40.0, -74.0);
        let store = FakeStore::with_rows(vec![
            store_row("A Pizza", None, None),
            store_row("B Pizza", None, Some(Coordinates::new(40.2, -74.0))),
            store_row("C Pizza", None, Some(Coordinates::new(40.01, -74.0))),
        ]);

        let results = dish_search(&store, "pizza", Some(here)).await.unwrap();
        assert_eq!(names(&results), ["C Pizza", "B Pizza", "A Pizza"]);
    }

    #[tokio::test]
    async fn whole_words_only() {
        let store = FakeStore::with_rows(vec![store_row("Piecrust Bakery", None, None)]);
        assert!(dish_search(&store, "pie", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_term_reads_nothing() {
        let store = FakeStore::default();
        assert!(dish_search(&store, "  ", None).await.unwrap().is_empty());
        assert_eq!(
            store.list_calls.load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }
}
