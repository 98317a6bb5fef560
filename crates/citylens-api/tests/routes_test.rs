//! Route tests over the in-memory resolver doubles.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use std::time::Duration;

use citylens_api::{router, AppState, GENERIC_ERROR_MESSAGE};
use citylens_core::Resource;
use citylens_resolver::testing::{Harness, MemoryResourceStore};

fn app(harness: &Harness) -> Router {
    router(AppState::new(harness.resolver()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Yield to the spawned write-back until `expected` rows are stored.
async fn wait_for_rows<R: Resource>(
    store: &MemoryResourceStore<R>,
    location_id: i64,
    expected: usize,
) {
    for _ in 0..100 {
        if store.rows_for(location_id).len() >= expected {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!(
        "expected {} stored rows for location {}, found {}",
        expected,
        location_id,
        store.rows_for(location_id).len()
    );
}

fn json_data(location: Value) -> String {
    urlencoding::encode(&location.to_string()).into_owned()
}

fn forecasts() -> Vec<Value> {
    vec![
        json!({ "summary": "Rain.", "time": 1_532_448_000 }),
        json!({ "summary": "Clear.", "time": 1_532_534_400 }),
    ]
}

// =============================================================================
// /location
// =============================================================================

#[tokio::test]
async fn test_location_resolves_and_is_stable() {
    let harness = Harness::new();
    harness
        .geocoder
        .push_match("Seattle, WA, USA", 47.6062095, -122.3320708);

    let (status, first) = get(app(&harness), "/location?data=seattle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], 1);
    assert_eq!(first["search_query"], "seattle");
    assert_eq!(first["formatted_query"], "Seattle, WA, USA");
    assert_eq!(first["latitude"], 47.6062095);

    let (_, second) = get(app(&harness), "/location?data=seattle").await;
    assert_eq!(first, second);
    assert_eq!(harness.geocoder.call_count(), 1);
}

#[tokio::test]
async fn test_location_requires_data() {
    let harness = Harness::new();

    let (status, body) = get(app(&harness), "/location").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("data"));
}

#[tokio::test]
async fn test_location_without_matches_is_bad_gateway() {
    let harness = Harness::new();

    let (status, body) = get(app(&harness), "/location?data=xyzzy").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "error": GENERIC_ERROR_MESSAGE }));
    assert!(harness.locations.is_empty());
}

// =============================================================================
// RESOURCE ROUTES
// =============================================================================

#[tokio::test]
async fn test_weather_with_json_data() {
    let harness = Harness::new();
    harness.weather.provider.set_items(forecasts());
    let uri = format!(
        "/weather?data={}",
        json_data(json!({ "id": 1, "latitude": 47.6, "longitude": -122.3 }))
    );

    let (status, body) = get(app(&harness), &uri).await;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["forecast"], "Rain.");
    assert_eq!(records[0]["time"], "Tue Jul 24 2018");
    assert_eq!(records[0]["location_id"], 1);

    wait_for_rows(&harness.weather.store, 1, 2).await;
    let (_, cached) = get(app(&harness), &uri).await;
    assert_eq!(cached, body);
    assert_eq!(harness.weather.provider.call_count(), 1);
}

#[tokio::test]
async fn test_yelp_with_bracket_data() {
    let harness = Harness::new();
    harness.listings.provider.set_items(vec![json!({
        "name": "Pike Place Chowder",
        "image_url": "https://s3-media.example/chowder.jpg",
        "price": "$$",
        "rating": 4.5,
        "url": "https://www.yelp.com/biz/pike-place-chowder-seattle"
    })]);

    let (status, body) = get(
        app(&harness),
        "/yelp?data%5Bid%5D=4&data%5Bsearch_query%5D=seattle&data%5Blatitude%5D=47.6",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Pike Place Chowder");
    assert_eq!(body[0]["rating"], 4.5);
    assert_eq!(
        harness.listings.provider.calls()[0].search_query.as_deref(),
        Some("seattle")
    );
}

#[tokio::test]
async fn test_empty_provider_result_is_empty_array() {
    let harness = Harness::new();
    let uri = format!(
        "/movies?data={}",
        json_data(json!({ "id": 2, "search_query": "nowhere" }))
    );

    let (status, body) = get(app(&harness), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_trails_without_coordinates_is_bad_request() {
    let harness = Harness::new();
    let uri = format!("/trails?data={}", json_data(json!({ "id": 2 })));

    let (status, body) = get(app(&harness), &uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(harness.trails.provider.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_data_is_bad_request() {
    let harness = Harness::new();

    let (status, _) = get(app(&harness), "/meetups?data=not-json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provider_failure_is_bad_gateway() {
    let harness = Harness::new();
    harness.events.provider.fail_with("HTTP 500 from meetup");
    let uri = format!(
        "/meetups?data={}",
        json_data(json!({ "id": 3, "latitude": 47.6, "longitude": -122.3 }))
    );

    let (status, body) = get(app(&harness), &uri).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let harness = Harness::new();
    harness.movies.store.fail_lookups();
    let uri = format!(
        "/movies?data={}",
        json_data(json!({ "id": 3, "search_query": "seattle" }))
    );

    let (status, body) = get(app(&harness), &uri).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_insert_failure_still_returns_records() {
    let harness = Harness::new();
    harness.weather.provider.set_items(forecasts());
    harness.weather.store.fail_on_insert(0);
    let uri = format!(
        "/weather?data={}",
        json_data(json!({ "id": 6, "latitude": 47.6, "longitude": -122.3 }))
    );

    let (status, body) = get(app(&harness), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    wait_for_rows(&harness.weather.store, 6, 1).await;
    assert_eq!(harness.weather.store.insert_calls(), 2);
}

#[tokio::test]
async fn test_hung_store_insert_does_not_delay_response() {
    let harness = Harness::new();
    harness.weather.provider.set_items(forecasts());
    harness.weather.store.stall_inserts();
    let uri = format!(
        "/weather?data={}",
        json_data(json!({ "id": 7, "latitude": 47.6, "longitude": -122.3 }))
    );

    let (status, body) = tokio::time::timeout(Duration::from_secs(2), get(app(&harness), &uri))
        .await
        .expect("response waited on the store");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert!(harness.weather.store.rows_for(7).is_empty());
}

// =============================================================================
// SYSTEM
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(&Harness::new()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_openapi_lists_routes() {
    let (status, body) = get(app(&Harness::new()), "/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    for route in ["/location", "/weather", "/meetups", "/movies", "/trails", "/yelp"] {
        assert!(body["paths"].get(route).is_some(), "missing {}", route);
    }
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let response = app(&Harness::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
