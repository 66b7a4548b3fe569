//! Restaurant search: identity resolution between the local store and the
//! places provider, relevance ranking and the nearby list.

pub mod cache;
mod cleanup;
pub mod dish;
pub mod error;
pub mod existing;
pub mod gateway;
pub mod nearby;
pub mod orchestrator;
mod scoring;

#[cfg(test)]
mod fakes;

pub use cache::{FileCache, MemoryCache};
pub use dish::{dish_search, expand_dish_term};
pub use error::{CacheError, SearchError};
pub use existing::find_existing_restaurant;
pub use gateway::{KeyValueCache, PgRestaurantStore, PlacesGateway, RestaurantStore};
pub use nearby::{nearby_cache_key, NearbyAggregator, NearbyCacheEntry, DEFAULT_NEARBY_TTL_SECS};
pub use orchestrator::SearchOrchestrator;
