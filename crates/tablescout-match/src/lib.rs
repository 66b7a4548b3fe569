//! Pure text, address and identity matching for restaurant search.
//!
//! Nothing in this crate performs I/O; every function is synchronous and
//! total over its inputs.

pub mod address;
pub mod dedup;
pub mod normalize;
pub mod query;
pub mod synonyms;
pub mod thresholds;

pub use address::{
    detect_country, parse_address, parse_address_with_country, AddressParseResult, Country,
    ParsedAddress,
};
pub use dedup::{is_duplicate, is_duplicate_of_store_row, AddressBar};
pub use normalize::{normalize, similarity, strip_leading_name};
pub use query::{analyze, QueryAnalysis, QueryKind};
pub use synonyms::{category_terms, is_category_term, related_terms};
