//! End-to-end search and nearby runs against a wiremock provider and an
//! in-memory store.

use tablescout_core::{Coordinates, PlaceCandidate, PlaceId};
use tablescout_db::DbError;
use tablescout_provider::ProviderClient;
use tablescout_search::{
    FileCache, NearbyAggregator, RestaurantStore, SearchOrchestrator,
};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct InMemoryStore(Vec<PlaceCandidate>);

impl RestaurantStore for InMemoryStore {
    async fn list_restaurants(&self) -> Result<Vec<PlaceCandidate>, DbError> {
        Ok(self.0.clone())
    }

    async fn find_by_place_id(&self, place_id: &str) -> Result<Vec<PlaceCandidate>, DbError> {
        Ok(self
            .0
            .iter()
            .filter(|row| row.linked_place_id.as_deref() == Some(place_id))
            .cloned()
            .collect())
    }
}

fn joes_row() -> PlaceCandidate {
    let mut row = PlaceCandidate::new(PlaceId::Store(Uuid::new_v4()), "Joe's Pizza");
    row.address.street = Some("123 Main St".to_string());
    row.coordinates = Some(Coordinates::new(40.1, -73.9));
    row
}

fn features(features: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "type": "FeatureCollection", "features": features })
}

fn pizza_feature() -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "properties": {
            "place_id": "51abc",
            "name": "Joes Pizza",
            "address_line1": "Joes Pizza",
            "address_line2": "123 Main Street, New York, NY 10001, United States of America",
            "formatted": "Joes Pizza, 123 Main Street, New York, NY 10001, United States of America",
            "lat": 40.1,
            "lon": -73.9,
            "datasource": { "sourcename": "openstreetmap" }
        }
    })
}

fn deli_feature() -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "properties": {
            "place_id": "77def",
            "name": "Corner Deli",
            "formatted": "Corner Deli, 9 Elm Street, New York, NY 10002, United States of America",
            "lat": 40.1005,
            "lon": -73.9,
            "datasource": { "sourcename": "openstreetmap" }
        }
    })
}

async fn provider(server: &MockServer) -> ProviderClient {
    Mock::given(method("GET"))
        .and(path("/v1/geocode/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(features(vec![pizza_feature()])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/places"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(features(vec![pizza_feature(), deli_feature()])),
        )
        .mount(server)
        .await;

    ProviderClient::with_base_url("test-key", 30, &server.uri())
        .expect("client construction should not fail")
        .with_retry_policy(0, 0)
}

#[tokio::test]
async fn provider_copy_of_store_record_is_merged_away() {
    let server = MockServer::start().await;
    let orchestrator =
        SearchOrchestrator::new(provider(&server).await, InMemoryStore(vec![joes_row()]));

    let results = orchestrator
        .search_scored("Joe's Pizza", None)
        .await
        .expect("search should succeed");

    let names: Vec<&str> = results.iter().map(|r| r.candidate.name.as_str()).collect();
    assert!(!names.contains(&"Joes Pizza"), "{names:?}");
    assert_eq!(results[0].candidate.name, "Joe's Pizza");
    assert!(results[0].candidate.is_store());
}

#[tokio::test]
async fn provider_outage_leaves_store_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let client = ProviderClient::with_base_url("test-key", 30, &server.uri())
        .expect("client construction should not fail")
        .with_retry_policy(0, 0);
    let orchestrator = SearchOrchestrator::new(client, InMemoryStore(vec![joes_row()]));

    let results = orchestrator
        .search("Joe's Pizza", Some(Coordinates::new(40.1, -73.9)))
        .await
        .expect("provider failures are absorbed");

    assert_eq!(results.len(), 1);
    assert!(results[0].is_store());
}

#[tokio::test]
async fn nearby_merges_and_writes_file_cache() {
    let server = MockServer::start().await;
    let cache_dir = std::env::temp_dir().join(format!("tablescout-e2e-{}", Uuid::new_v4()));
    let nearby = NearbyAggregator::new(
        provider(&server).await,
        InMemoryStore(vec![joes_row()]),
        FileCache::new(&cache_dir),
    );
    let here = Coordinates::new(40.1, -73.9);

    let first = nearby.fetch_nearby(here, 1.0).await.expect("nearby");
    let names: Vec<&str> = first.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Joe's Pizza", "Corner Deli"]);
    assert_eq!(first[1].address.city.as_deref(), Some("New York"));
    assert_eq!(first[1].address.postal_code.as_deref(), Some("10002"));

    let requests_after_first = server.received_requests().await.unwrap_or_default().len();
    let second = nearby.fetch_nearby(here, 1.0).await.expect("nearby");
    assert_eq!(first, second);
    assert_eq!(
        server.received_requests().await.unwrap_or_default().len(),
        requests_after_first
    );

    let _ = std::fs::remove_dir_all(&cache_dir);
}
