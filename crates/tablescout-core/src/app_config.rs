use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub provider_api_key: String,
    pub provider_base_url: String,
    pub provider_timeout_secs: u64,
    pub provider_max_retries: u32,
    pub provider_backoff_base_secs: u64,
    pub user_agent: String,
    pub nearby_cache_ttl_secs: u64,
    pub cache_dir: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("provider_api_key", &"[redacted]")
            .field("provider_base_url", &self.provider_base_url)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("provider_max_retries", &self.provider_max_retries)
            .field(
                "provider_backoff_base_secs",
                &self.provider_backoff_base_secs,
            )
            .field("user_agent", &self.user_agent)
            .field("nearby_cache_ttl_secs", &self.nearby_cache_ttl_secs)
            .field("cache_dir", &self.cache_dir)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
