//! Integration tests for `ProviderClient` using wiremock HTTP mocks.

use tablescout_core::Coordinates;
use tablescout_provider::{
    CircleFilter, GeocodeKind, GeocodeRequest, PlacesRequest, ProviderClient, ProviderError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ProviderClient {
    ProviderClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_retry_policy(2, 0)
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
            "housenumber": "123",
            "street": "Main Street",
            "city": "New York",
            "state": "New York",
            "postcode": "10001",
            "country": "United States",
            "lat": 40.1,
            "lon": -73.9,
            "categories": ["catering", "catering.restaurant", "catering.restaurant.pizza"],
            "website": "https://joespizza.example",
            "datasource": { "sourcename": "openstreetmap" }
        },
        "geometry": { "type": "Point", "coordinates": [-73.9, 40.1] }
    })
}

#[tokio::test]
async fn geocode_sends_filter_and_bias_and_parses_features() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/geocode/search"))
        .and(query_param("text", "joes pizza"))
        .and(query_param("type", "amenity"))
        .and(query_param("filter", "circle:-73.9,40.1,80000"))
        .and(query_param("format", "geojson"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "FeatureCollection",
            "features": [pizza_feature()]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let request = GeocodeRequest {
        kind: Some(GeocodeKind::Amenity),
        filter: Some(CircleFilter {
            center: Coordinates::new(40.1, -73.9),
            radius_m: 80_000,
        }),
        ..GeocodeRequest::new("joes pizza")
    };
    let places = client.geocode(&request).await.expect("geocode should succeed");

    assert_eq!(places.len(), 1);
    let place = &places[0];
    assert_eq!(place.place_id.as_deref(), Some("51abc"));
    assert_eq!(place.name.as_deref(), Some("Joes Pizza"));
    assert_eq!(place.categories.len(), 3);
    assert!(!place.is_authoritative());
}

#[tokio::test]
async fn missing_features_is_zero_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "FeatureCollection"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .places(&PlacesRequest::new(Coordinates::new(40.1, -73.9), 1_000))
        .await
        .expect("missing features is not an error");
    assert!(places.is_empty());
}

#[tokio::test]
async fn places_sends_categories_and_circle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/places"))
        .and(query_param("categories", "catering.restaurant,catering.cafe"))
        .and(query_param("filter", "circle:-73.9,40.1,1609"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "features": [pizza_feature(), pizza_feature()]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let request = PlacesRequest {
        categories: vec![
            "catering.restaurant".to_owned(),
            "catering.cafe".to_owned(),
        ],
        ..PlacesRequest::new(Coordinates::new(40.1, -73.9), 1_609)
    };
    let places = client.places(&request).await.expect("places should succeed");
    assert_eq!(places.len(), 2);
}

#[tokio::test]
async fn place_details_returns_first_feature() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/place-details"))
        .and(query_param("id", "51abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "features": [pizza_feature()]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let place = client
        .place_details("51abc")
        .await
        .expect("details should be found");
    assert_eq!(place.website.as_deref(), Some("https://joespizza.example"));
}

#[tokio::test]
async fn place_details_without_features_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/place-details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "features": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.place_details("gone").await.unwrap_err();
    assert!(matches!(err, ProviderError::NoDetails { ref place_id } if place_id == "gone"));
}

#[tokio::test]
async fn rate_limited_request_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/geocode/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/geocode/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "features": [pizza_feature()]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .geocode(&GeocodeRequest::new("joes pizza"))
        .await
        .expect("second attempt should succeed");
    assert_eq!(places.len(), 1);
}

#[tokio::test]
async fn unauthorized_maps_to_unexpected_status_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/geocode/search"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .geocode(&GeocodeRequest::new("anything"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::UnexpectedStatus { status: 401, .. }
    ));
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/geocode/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .geocode(&GeocodeRequest::new("anything"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Deserialize { .. }));
}
