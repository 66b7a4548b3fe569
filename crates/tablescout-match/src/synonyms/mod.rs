//! Dish-term and category expansion over static dictionaries.
//!
//! Reverse lookups (term → canonical entries, category key → members) are
//! built once on first use. Unknown terms degrade to the term and its naive
//! singular/plural forms.

mod tables;

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use crate::normalize::normalize;
use tables::{CUISINE_FAMILIES, FOOD_CATEGORIES, MEAL_TIMES, SYNONYMS};

/// Any term (canonical or synonym) → indices into `SYNONYMS`.
static SYNONYM_INDEX: LazyLock<HashMap<&'static str, Vec<usize>>> = LazyLock::new(|| {
    let mut index: HashMap<&'static str, Vec<usize>> = HashMap::new();
    for (i, (canonical, synonyms)) in SYNONYMS.iter().enumerate() {
        for term in std::iter::once(canonical).chain(synonyms.iter()) {
            let entry = index.entry(*term).or_default();
            if !entry.contains(&i) {
                entry.push(i);
            }
        }
    }
    index
});

/// Category, cuisine, meal-time and subcategory keys → flattened members.
static CATEGORY_INDEX: LazyLock<HashMap<&'static str, Vec<&'static str>>> =
    LazyLock::new(|| {
        let mut index: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        for (key, members) in CUISINE_FAMILIES.iter().chain(MEAL_TIMES.iter()) {
            index.entry(*key).or_default().extend(members.iter().copied());
        }
        for (category, subcategories) in FOOD_CATEGORIES {
            for (subcategory, members) in *subcategories {
                let flattened = index.entry(*category).or_default();
                flattened.push(*subcategory);
                flattened.extend(members.iter().copied());
                index
                    .entry(*subcategory)
                    .or_default()
                    .extend(members.iter().copied());
            }
        }
        index
    });

/// The term, its naive singular/plural variant and every dictionary
/// synonym reachable through it, in either direction.
#[must_use]
pub fn related_terms(term: &str) -> BTreeSet<String> {
    let forms = inflections(&normalize(term));
    let mut related = BTreeSet::new();

    for form in &forms {
        let Some(indices) = SYNONYM_INDEX.get(form.as_str()) else {
            continue;
        };
        for &i in indices {
            let (canonical, synonyms) = SYNONYMS[i];
            related.insert(canonical.to_string());
            related.extend(synonyms.iter().map(|s| (*s).to_string()));
        }
    }

    related.extend(forms);
    related
}

/// Whether `term` (or its singular/plural) is a cuisine, meal-time, food
/// category or subcategory key.
#[must_use]
pub fn is_category_term(term: &str) -> bool {
    inflections(&normalize(term))
        .iter()
        .any(|form| CATEGORY_INDEX.contains_key(form.as_str()))
}

/// Every member of a category key, with nested subcategories flattened.
#[must_use]
pub fn category_terms(category: &str) -> BTreeSet<String> {
    let forms = inflections(&normalize(category));
    let members: BTreeSet<String> = forms
        .iter()
        .filter_map(|form| CATEGORY_INDEX.get(form.as_str()))
        .flatten()
        .map(|m| (*m).to_string())
        .collect();

    if members.is_empty() {
        forms.into_iter().collect()
    } else {
        members
    }
}

/// `term` plus its naive singular and plural forms. Only the last word
/// inflects.
fn inflections(term: &str) -> Vec<String> {
    if term.is_empty() {
        return Vec::new();
    }

    let mut forms = vec![term.to_string()];
    let base = singular(term).unwrap_or_else(|| term.to_string());
    for form in [base.clone(), plural(&base)] {
        if !forms.contains(&form) {
            forms.push(form);
        }
    }
    forms
}

fn singular(term: &str) -> Option<String> {
    if term.len() > 4 && term.ends_with("ies") {
        return Some(format!("{}y", &term[..term.len() - 3]));
    }
    for suffix in ["ches", "shes", "xes", "ses", "zes"] {
        if term.ends_with(suffix) {
            return Some(term[..term.len() - 2].to_string());
        }
    }
    if term.len() > 2 && term.ends_with('s') && !term.ends_with("ss") && !term.ends_with("us") {
        return Some(term[..term.len() - 1].to_string());
    }
    None
}

fn plural(term: &str) -> String {
    let bytes = term.as_bytes();
    if let [.., before, b'y'] = bytes {
        if !b"aeiou".contains(before) {
            return format!("{}ies", &term[..term.len() - 1]);
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| term.ends_with(s)) {
        return format!("{term}es");
    }
    format!("{term}s")
}
