//! HTTP client for the places/geocoding provider.
//!
//! Three endpoints are used: forward geocoding, radius place search and
//! place details. All share one request path with status mapping and
//! retry on transient failures.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tablescout_core::AppConfig;

use crate::error::ProviderError;
use crate::retry::retry_with_backoff;
use crate::types::{FeatureCollection, GeocodeRequest, Place, PlacesRequest};

const DEFAULT_BASE_URL: &str = "https://api.geoapify.com/";
const DEFAULT_USER_AGENT: &str = "tablescout/0.1 (restaurant-search)";

const GEOCODE_PATH: &str = "v1/geocode/search";
const PLACES_PATH: &str = "v2/places";
const PLACE_DETAILS_PATH: &str = "v2/place-details";

/// Client for the provider REST API.
///
/// Use [`ProviderClient::new`] for production or
/// [`ProviderClient::with_base_url`] to point at a mock server in tests.
pub struct ProviderClient {
    client: Client,
    api_key: String,
    base_url: Url,
    /// Additional attempts after the first failure.
    max_retries: u32,
    backoff_base_secs: u64,
}

impl ProviderClient {
    /// Creates a client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ProviderError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Self::build(api_key, timeout_secs, DEFAULT_USER_AGENT, base_url)
    }

    /// Creates a client from application configuration, including retry
    /// policy and user agent.
    ///
    /// # Errors
    ///
    /// Same as [`ProviderClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        Ok(Self::build(
            &config.provider_api_key,
            config.provider_timeout_secs,
            &config.user_agent,
            &config.provider_base_url,
        )?
        .with_retry_policy(
            config.provider_max_retries,
            config.provider_backoff_base_secs,
        ))
    }

    /// Overrides the retry policy. `max_retries = 0` disables retries.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_secs: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_secs = backoff_base_secs;
        self
    }

    fn build(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so relative endpoint paths are appended
        // rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            max_retries: 2,
            backoff_base_secs: 1,
        })
    }

    /// Forward geocoding: free text to ranked places.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::RateLimited`] / [`ProviderError::Http`] after all
    ///   retries are exhausted.
    /// - [`ProviderError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ProviderError::Deserialize`] if the body is not a feature
    ///   collection.
    pub async fn geocode(&self, request: &GeocodeRequest) -> Result<Vec<Place>, ProviderError> {
        let url = self.build_url(GEOCODE_PATH, &request.query_pairs())?;
        let body = self.request_features(&url, GEOCODE_PATH).await?;
        let places = body.into_places();
        tracing::debug!(text = %request.text, count = places.len(), "geocode complete");
        Ok(places)
    }

    /// Catering venues inside a circle.
    ///
    /// # Errors
    ///
    /// Same as [`ProviderClient::geocode`].
    pub async fn places(&self, request: &PlacesRequest) -> Result<Vec<Place>, ProviderError> {
        let url = self.build_url(PLACES_PATH, &request.query_pairs())?;
        let body = self.request_features(&url, PLACES_PATH).await?;
        let places = body.into_places();
        tracing::debug!(
            radius_m = request.radius_m,
            count = places.len(),
            "places search complete"
        );
        Ok(places)
    }

    /// Full record for one place id.
    ///
    /// # Errors
    ///
    /// [`ProviderError::NoDetails`] when the response has no features, plus
    /// the errors of [`ProviderClient::geocode`].
    pub async fn place_details(&self, place_id: &str) -> Result<Place, ProviderError> {
        let url = self.build_url(PLACE_DETAILS_PATH, &[("id", place_id.to_owned())])?;
        let body = self.request_features(&url, PLACE_DETAILS_PATH).await?;
        body.into_places()
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NoDetails {
                place_id: place_id.to_owned(),
            })
    }

    /// Joins `path` onto the base URL and appends `params` plus the API key
    /// via [`Url::query_pairs_mut`], so every value is percent-encoded.
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ProviderError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ProviderError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("apiKey", &self.api_key);
        }
        Ok(url)
    }

    /// GET `url`, map the status, and parse a feature collection, retrying
    /// transient failures.
    async fn request_features(
        &self,
        url: &Url,
        endpoint: &str,
    ) -> Result<FeatureCollection, ProviderError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url).send().await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ProviderError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(ProviderError::UnexpectedStatus {
                        status: status.as_u16(),
                        endpoint: endpoint.to_owned(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<FeatureCollection>(&body).map_err(|e| {
                    ProviderError::Deserialize {
                        context: endpoint.to_owned(),
                        source: e,
                    }
                })
            }
        })
        .await
    }
}
