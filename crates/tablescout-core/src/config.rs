use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;
    let provider_api_key = require("TABLESCOUT_PROVIDER_API_KEY")?;

    let env = parse_environment(&or_default("TABLESCOUT_ENV", "development"))?;
    let log_level = or_default("TABLESCOUT_LOG_LEVEL", "info");

    let provider_base_url = or_default("TABLESCOUT_PROVIDER_BASE_URL", "https://api.geoapify.com");
    let provider_timeout_secs = parse_var(&lookup, "TABLESCOUT_PROVIDER_TIMEOUT_SECS", 15)?;
    let provider_max_retries = parse_var(&lookup, "TABLESCOUT_PROVIDER_MAX_RETRIES", 2)?;
    let provider_backoff_base_secs =
        parse_var(&lookup, "TABLESCOUT_PROVIDER_BACKOFF_BASE_SECS", 1)?;
    let user_agent = or_default("TABLESCOUT_USER_AGENT", "tablescout/0.1 (restaurant-search)");

    let nearby_cache_ttl_secs = parse_var(&lookup, "TABLESCOUT_NEARBY_CACHE_TTL_SECS", 900)?;
    let cache_dir = PathBuf::from(or_default("TABLESCOUT_CACHE_DIR", "./.cache/tablescout"));

    let db_max_connections = parse_var(&lookup, "TABLESCOUT_DB_MAX_CONNECTIONS", 10)?;
    let db_min_connections = parse_var(&lookup, "TABLESCOUT_DB_MIN_CONNECTIONS", 1)?;
    let db_acquire_timeout_secs = parse_var(&lookup, "TABLESCOUT_DB_ACQUIRE_TIMEOUT_SECS", 10)?;

    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "TABLESCOUT_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        provider_api_key,
        provider_base_url,
        provider_timeout_secs,
        provider_max_retries,
        provider_backoff_base_secs,
        user_agent,
        nearby_cache_ttl_secs,
        cache_dir,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse an optional numeric variable, falling back to `default` when unset.
fn parse_var<T, F>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match lookup(var) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TABLESCOUT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
