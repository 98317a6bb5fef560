//! Core traits for citylens abstractions.
//!
//! The resolver is written against these traits so the PostgreSQL store and
//! the HTTP provider clients can be swapped for in-memory doubles in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{LocationRecord, LocationRef};
use crate::normalize::RawGeocodeResult;
use crate::resource::Resource;

// =============================================================================
// STORE TRAITS
// =============================================================================

/// Persistence for geocoded locations.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Find the location stored for an exact search query.
    async fn find_by_query(&self, search_query: &str) -> Result<Option<LocationRecord>>;

    /// Insert a location and return the stored row.
    ///
    /// Inserting a search query that already exists returns the row already
    /// stored for it, not the values passed in.
    async fn insert(&self, location: &LocationRecord) -> Result<LocationRecord>;
}

/// Persistence for one location-scoped resource table.
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    /// All rows for a location, in insertion order. Empty when none exist.
    async fn find_by_location(&self, location_id: i64) -> Result<Vec<R>>;

    /// Insert one record under `location_id` and return its row id.
    async fn insert(&self, location_id: i64, record: &R) -> Result<i64>;
}

// =============================================================================
// PROVIDER TRAITS
// =============================================================================

/// Forward geocoding of a free-text query.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// All matches for the query, best first. Empty when nothing matched.
    async fn geocode(&self, query: &str) -> Result<Vec<RawGeocodeResult>>;
}

/// External source for one resource kind.
#[async_trait]
pub trait ResourceProvider<R: Resource>: Send + Sync {
    /// Raw items for a location. An empty payload is `Ok(vec![])`.
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<R::Raw>>;
}
