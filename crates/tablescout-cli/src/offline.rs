//! Command handlers that only exercise the matching library.

use tablescout_match::{analyze, is_category_term, parse_address};
use tablescout_search::expand_dish_term;

use crate::print_json;

pub(crate) fn run_parse_address(address: &str) -> anyhow::Result<()> {
    print_json(&parse_address(address))
}

pub(crate) fn run_analyze(query: &str) -> anyhow::Result<()> {
    print_json(&analyze(query))
}

pub(crate) fn run_expand(term: &str) -> anyhow::Result<()> {
    print_json(&serde_json::json!({
        "term": term,
        "is_category": is_category_term(term),
        "expanded": expand_dish_term(term),
    }))
}
