//! PostgreSQL store integration tests.
//!
//! Require a migrated database. Run with:
//! `cargo test -p citylens-db --features migrations -- --ignored`

use citylens_core::{
    LocationRecord, LocationStore, ResourceStore, TrailRecord, WeatherRecord,
};
use citylens_db::test_fixtures::TestDatabase;

fn location(query: &str) -> LocationRecord {
    LocationRecord {
        id: None,
        search_query: query.to_string(),
        formatted_query: Some("Seattle, WA, USA".to_string()),
        latitude: 47.6062095,
        longitude: -122.3320708,
    }
}

async fn stored_location_id(test_db: &TestDatabase, query: &str) -> i64 {
    test_db
        .db
        .locations
        .insert(&location(query))
        .await
        .expect("insert failed")
        .id
        .expect("stored location has an id")
}

fn forecast(summary: &str, time: &str) -> WeatherRecord {
    WeatherRecord {
        forecast: Some(summary.to_string()),
        time: time.to_string(),
        location_id: None,
    }
}

#[tokio::test]
#[ignore]
async fn test_location_insert_then_find() {
    let test_db = TestDatabase::new().await;
    let query = test_db.unique_query("seattle");

    assert!(test_db
        .db
        .locations
        .find_by_query(&query)
        .await
        .expect("lookup failed")
        .is_none());

    let stored = test_db
        .db
        .locations
        .insert(&location(&query))
        .await
        .expect("insert failed");

    let found = test_db
        .db
        .locations
        .find_by_query(&query)
        .await
        .expect("lookup failed")
        .expect("location should exist");
    assert!(stored.id.is_some());
    assert_eq!(found, stored);
    assert_eq!(found.search_query, query);
    assert_eq!(found.latitude, 47.6062095);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_location_insert_is_idempotent_per_query() {
    let test_db = TestDatabase::new().await;
    let query = test_db.unique_query("tacoma");

    let first = test_db.db.locations.insert(&location(&query)).await.unwrap();

    // A losing racer carries its own geocode values; the stored row wins.
    let mut racer = location(&query);
    racer.formatted_query = Some("Tacoma, Washington".to_string());
    racer.latitude = 47.25;
    racer.longitude = -122.44;
    let second = test_db.db.locations.insert(&racer).await.unwrap();
    assert_eq!(first, second, "same query must return the stored row");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations WHERE search_query = $1")
        .bind(&query)
        .fetch_one(&test_db.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_resource_rows_round_trip_in_insert_order() {
    let test_db = TestDatabase::new().await;
    let query = test_db.unique_query("bellevue");
    let location_id = stored_location_id(&test_db, &query).await;

    assert!(test_db
        .db
        .weather
        .find_by_location(location_id)
        .await
        .unwrap()
        .is_empty());

    for (summary, day) in [
        ("Rain", "Mon Jul 23 2018"),
        ("Clouds", "Tue Jul 24 2018"),
        ("Sun", "Wed Jul 25 2018"),
    ] {
        test_db
            .db
            .weather
            .insert(location_id, &forecast(summary, day))
            .await
            .expect("insert failed");
    }

    let rows = test_db.db.weather.find_by_location(location_id).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].forecast.as_deref(), Some("Rain"));
    assert_eq!(rows[2].time, "Wed Jul 25 2018");
    assert!(rows.iter().all(|r| r.location_id == Some(location_id)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_trail_optional_columns_store_null() {
    let test_db = TestDatabase::new().await;
    let query = test_db.unique_query("north-bend");
    let location_id = stored_location_id(&test_db, &query).await;

    let trail = TrailRecord {
        name: Some("Rattlesnake Ledge".to_string()),
        location: None,
        length: Some(5.3),
        stars: None,
        star_votes: None,
        summary: None,
        trail_url: None,
        conditions: None,
        condition_date: "2018-07-21".to_string(),
        condition_time: "11:03:12".to_string(),
        location_id: None,
    };
    test_db.db.trails.insert(location_id, &trail).await.unwrap();

    let rows = test_db.db.trails.find_by_location(location_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].stars, None);
    assert_eq!(rows[0].length, Some(5.3));
    assert_eq!(rows[0].condition_time, "11:03:12");

    test_db.cleanup().await;
}
