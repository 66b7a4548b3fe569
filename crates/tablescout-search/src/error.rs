use tablescout_db::DbError;
use thiserror::Error;

/// Failure of a search or nearby lookup as seen by the caller.
///
/// Provider failures never appear here: they are absorbed per strategy.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The local store could not be read. Without it there is no identity
    /// ground truth, so the whole operation fails.
    #[error("restaurant store unavailable: {0}")]
    Store(#[from] DbError),

    /// A newer search started before this one finished; its result is
    /// discarded.
    #[error("search superseded by a newer search")]
    Superseded,
}

/// Key-value cache fault. Always logged and treated as a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
