pub mod app_config;
pub mod candidate;
pub mod config;
pub mod geo;

pub use app_config::{AppConfig, Environment};
pub use candidate::{
    AddressParts, Passthrough, PlaceCandidate, PlaceId, ScoredCandidate, Source,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{Coordinates, KM_PER_MILE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
