//! Command handlers that need the database and the provider.

use anyhow::Context;
use tablescout_core::{AppConfig, Coordinates};
use tablescout_provider::ProviderClient;
use tablescout_search::{
    dish_search, find_existing_restaurant, FileCache, NearbyAggregator, PgRestaurantStore,
    SearchOrchestrator,
};
use tracing::info;

use crate::print_json;

/// Both coordinates or neither; out-of-range values are rejected.
///
/// # Errors
///
/// Returns an error if the coordinates are outside the valid range.
pub(crate) fn user_position(
    lat: Option<f64>,
    lon: Option<f64>,
) -> anyhow::Result<Option<Coordinates>> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            let point = Coordinates::new(lat, lon);
            anyhow::ensure!(point.is_valid(), "coordinates out of range: {lat}, {lon}");
            Ok(Some(point))
        }
        _ => Ok(None),
    }
}

fn load_config() -> anyhow::Result<AppConfig> {
    tablescout_core::load_app_config().context("failed to load configuration")
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<PgRestaurantStore> {
    let pool = tablescout_db::connect_pool_from_config(config)
        .await
        .context("failed to connect to database")?;
    Ok(PgRestaurantStore::new(pool))
}

fn provider_client(config: &AppConfig) -> anyhow::Result<ProviderClient> {
    ProviderClient::from_config(config).context("failed to build provider client")
}

pub(crate) async fn run_db_ping() -> anyhow::Result<()> {
    let config = load_config()?;
    let pool = tablescout_db::connect_pool_from_config(&config).await?;
    tablescout_db::ping(&pool).await?;
    info!("database ping succeeded");
    println!("database ok");
    Ok(())
}

pub(crate) async fn run_search(
    query: &str,
    user: Option<Coordinates>,
    scores: bool,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let orchestrator =
        SearchOrchestrator::new(provider_client(&config)?, connect_store(&config).await?);

    if scores {
        let results = orchestrator.search_scored(query, user).await?;
        info!(query, count = results.len(), "search complete");
        print_json(&results)
    } else {
        let results = orchestrator.search(query, user).await?;
        info!(query, count = results.len(), "search complete");
        print_json(&results)
    }
}

pub(crate) async fn run_nearby(lat: f64, lon: f64, radius_miles: f64) -> anyhow::Result<()> {
    let location =
        user_position(Some(lat), Some(lon))?.context("nearby needs a latitude and longitude")?;
    anyhow::ensure!(radius_miles > 0.0, "radius must be positive");

    let config = load_config()?;
    let ttl_secs = i64::try_from(config.nearby_cache_ttl_secs)
        .context("TABLESCOUT_NEARBY_CACHE_TTL_SECS is too large")?;
    let nearby = NearbyAggregator::new(
        provider_client(&config)?,
        connect_store(&config).await?,
        FileCache::new(config.cache_dir.clone()),
    )
    .with_ttl(chrono::Duration::seconds(ttl_secs));

    let results = nearby.fetch_nearby(location, radius_miles).await?;
    info!(radius_miles, count = results.len(), "nearby complete");
    print_json(&results)
}

pub(crate) async fn run_dish(term: &str, user: Option<Coordinates>) -> anyhow::Result<()> {
    let config = load_config()?;
    let store = connect_store(&config).await?;
    let results = dish_search(&store, term, user).await?;
    info!(term, count = results.len(), "dish search complete");
    print_json(&results)
}

pub(crate) async fn run_existing(place_id: &str) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = provider_client(&config)?;
    let place = client.place_details(place_id).await?;
    let candidate = place
        .into_candidate()
        .with_context(|| format!("place {place_id} has no name"))?;

    let store = connect_store(&config).await?;
    let existing = find_existing_restaurant(&store, &candidate).await?;
    info!(place_id, found = existing.is_some(), "existing lookup complete");
    print_json(&serde_json::json!({
        "candidate": candidate,
        "existing": existing,
    }))
}
