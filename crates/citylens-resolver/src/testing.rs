//! In-memory stores and scripted providers for deterministic testing.
//!
//! Every double is `Clone` and shares its state through `Arc`, so a test can
//! keep a handle for assertions after handing a clone to the [`Resolver`].
//!
//! ```rust,ignore
//! use citylens_resolver::testing::Harness;
//! use serde_json::json;
//!
//! let harness = Harness::new();
//! harness.geocoder.push_match("Seattle, WA, USA", 47.6062, -122.3321);
//! harness.weather.provider.set_items(vec![json!({"summary": "Rain.", "time": 1532448000})]);
//!
//! let resolver = harness.resolver();
//! let location = resolver.resolve_location("seattle").await?;
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use citylens_core::normalize::{RawGeometry, RawLatLng};
use citylens_core::{
    BusinessListing, Error, EventRecord, Geocoder, LocationRecord, LocationRef, LocationStore,
    MovieRecord, RawGeocodeResult, Resource, ResourceProvider, ResourceStore, Result,
    TrailRecord, WeatherRecord,
};

use crate::cache::ResourceSource;
use crate::{ResourceSources, Resolver};

// =============================================================================
// STORES
// =============================================================================

/// Location store keyed by exact search query.
#[derive(Clone, Default)]
pub struct MemoryLocationStore {
    rows: Arc<Mutex<Vec<LocationRecord>>>,
    fail_lookups: Arc<Mutex<bool>>,
    miss_lookups: Arc<Mutex<bool>>,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every lookup fail with an internal error.
    pub fn fail_lookups(&self) {
        *self.fail_lookups.lock().unwrap() = true;
    }

    /// Make every lookup report no match while rows stay in place, as when
    /// another request inserts the same query between lookup and insert.
    pub fn miss_lookups(&self) {
        *self.miss_lookups.lock().unwrap() = true;
    }

    /// Store a location directly and return it with its assigned id.
    pub fn seed(&self, mut location: LocationRecord) -> LocationRecord {
        let mut rows = self.rows.lock().unwrap();
        location.id = Some(rows.len() as i64 + 1);
        rows.push(location.clone());
        location
    }

    /// All stored locations in insertion order.
    pub fn records(&self) -> Vec<LocationRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LocationStore for MemoryLocationStore {
    async fn find_by_query(&self, search_query: &str) -> Result<Option<LocationRecord>> {
        if *self.fail_lookups.lock().unwrap() {
            return Err(Error::Internal("injected lookup failure".to_string()));
        }
        if *self.miss_lookups.lock().unwrap() {
            return Ok(None);
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.search_query == search_query)
            .cloned())
    }

    async fn insert(&self, location: &LocationRecord) -> Result<LocationRecord> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows
            .iter()
            .find(|l| l.search_query == location.search_query)
        {
            return Ok(existing.clone());
        }
        let mut stored = location.clone();
        stored.id = Some(rows.len() as i64 + 1);
        rows.push(stored.clone());
        Ok(stored)
    }
}

#[derive(Debug, Clone)]
struct StoredRow<R> {
    location_id: i64,
    record: R,
}

/// Resource store holding rows in insertion order.
pub struct MemoryResourceStore<R> {
    rows: Arc<Mutex<Vec<StoredRow<R>>>>,
    insert_calls: Arc<Mutex<usize>>,
    failing_inserts: Arc<Mutex<HashSet<usize>>>,
    fail_lookups: Arc<Mutex<bool>>,
    stall_inserts: Arc<Mutex<bool>>,
}

impl<R> Clone for MemoryResourceStore<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            insert_calls: Arc::clone(&self.insert_calls),
            failing_inserts: Arc::clone(&self.failing_inserts),
            fail_lookups: Arc::clone(&self.fail_lookups),
            stall_inserts: Arc::clone(&self.stall_inserts),
        }
    }
}

impl<R> Default for MemoryResourceStore<R> {
    fn default() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            insert_calls: Arc::new(Mutex::new(0)),
            failing_inserts: Arc::new(Mutex::new(HashSet::new())),
            fail_lookups: Arc::new(Mutex::new(false)),
            stall_inserts: Arc::new(Mutex::new(false)),
        }
    }
}

impl<R: Resource> MemoryResourceStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `nth` insert call (zero-based, counted across the store's
    /// lifetime).
    pub fn fail_on_insert(&self, nth: usize) {
        self.failing_inserts.lock().unwrap().insert(nth);
    }

    /// Make every lookup fail with an internal error.
    pub fn fail_lookups(&self) {
        *self.fail_lookups.lock().unwrap() = true;
    }

    /// Make every insert call hang forever.
    pub fn stall_inserts(&self) {
        *self.stall_inserts.lock().unwrap() = true;
    }

    /// Seed a row without counting it as an insert call.
    pub fn seed(&self, location_id: i64, mut record: R) {
        record.set_location_id(location_id);
        self.rows.lock().unwrap().push(StoredRow {
            location_id,
            record,
        });
    }

    /// Stored rows for a location.
    pub fn rows_for(&self, location_id: i64) -> Vec<R> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.location_id == location_id)
            .map(|row| row.record.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of insert calls made, failed ones included.
    pub fn insert_calls(&self) -> usize {
        *self.insert_calls.lock().unwrap()
    }
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for MemoryResourceStore<R> {
    async fn find_by_location(&self, location_id: i64) -> Result<Vec<R>> {
        if *self.fail_lookups.lock().unwrap() {
            return Err(Error::Internal("injected lookup failure".to_string()));
        }
        Ok(self.rows_for(location_id))
    }

    async fn insert(&self, location_id: i64, record: &R) -> Result<i64> {
        let nth = {
            let mut calls = self.insert_calls.lock().unwrap();
            let nth = *calls;
            *calls += 1;
            nth
        };
        let stalled = *self.stall_inserts.lock().unwrap();
        if stalled {
            futures::future::pending::<()>().await;
        }
        if self.failing_inserts.lock().unwrap().contains(&nth) {
            return Err(Error::Internal(format!("injected failure on insert {}", nth)));
        }

        let mut rows = self.rows.lock().unwrap();
        let mut stored = record.clone();
        stored.set_location_id(location_id);
        rows.push(StoredRow {
            location_id,
            record: stored,
        });
        Ok(rows.len() as i64)
    }
}

// =============================================================================
// PROVIDERS
// =============================================================================

/// Geocoder returning scripted matches and logging every query.
#[derive(Clone, Default)]
pub struct StubGeocoder {
    matches: Arc<Mutex<Vec<RawGeocodeResult>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a match with coordinates.
    pub fn push_match(&self, formatted_address: &str, lat: f64, lng: f64) {
        self.push_raw(RawGeocodeResult {
            formatted_address: Some(formatted_address.to_string()),
            geometry: Some(RawGeometry {
                location: Some(RawLatLng { lat, lng }),
            }),
        });
    }

    /// Add an arbitrary raw match.
    pub fn push_raw(&self, result: RawGeocodeResult) {
        self.matches.lock().unwrap().push(result);
    }

    /// Fail every call with a provider error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Queries received, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<RawGeocodeResult>> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::Provider(message));
        }
        Ok(self.matches.lock().unwrap().clone())
    }
}

/// Resource provider returning scripted JSON items.
///
/// Items are deserialized into `R::Raw` on every call, exactly as a real
/// response body would be.
pub struct StubProvider<R> {
    items: Arc<Mutex<Vec<Value>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<LocationRef>>>,
    _record: std::marker::PhantomData<fn() -> R>,
}

impl<R> Clone for StubProvider<R> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            failure: Arc::clone(&self.failure),
            calls: Arc::clone(&self.calls),
            _record: std::marker::PhantomData,
        }
    }
}

impl<R> Default for StubProvider<R> {
    fn default() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
            _record: std::marker::PhantomData,
        }
    }
}

impl<R: Resource> StubProvider<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_items(&self, items: Vec<Value>) {
        *self.items.lock().unwrap() = items;
    }

    /// Fail every call with a provider error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Locations requested, in order.
    pub fn calls(&self) -> Vec<LocationRef> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl<R: Resource> ResourceProvider<R> for StubProvider<R> {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<R::Raw>> {
        self.calls.lock().unwrap().push(location.clone());
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::Provider(message));
        }
        let items = self.items.lock().unwrap().clone();
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(Error::from))
            .collect()
    }
}

// =============================================================================
// HARNESS
// =============================================================================

/// Store and provider doubles for one resource kind.
pub struct Fixture<R> {
    pub store: MemoryResourceStore<R>,
    pub provider: StubProvider<R>,
}

impl<R: Resource> Fixture<R> {
    pub fn new() -> Self {
        Self {
            store: MemoryResourceStore::new(),
            provider: StubProvider::new(),
        }
    }

    pub fn source(&self) -> ResourceSource<R> {
        ResourceSource::new(Arc::new(self.store.clone()), Arc::new(self.provider.clone()))
    }
}

impl<R: Resource> Default for Fixture<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every double needed to build a [`Resolver`].
#[derive(Default)]
pub struct Harness {
    pub locations: MemoryLocationStore,
    pub geocoder: StubGeocoder,
    pub weather: Fixture<WeatherRecord>,
    pub events: Fixture<EventRecord>,
    pub movies: Fixture<MovieRecord>,
    pub trails: Fixture<TrailRecord>,
    pub listings: Fixture<BusinessListing>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver sharing state with this harness.
    pub fn resolver(&self) -> Resolver {
        Resolver::new(
            Arc::new(self.locations.clone()),
            Arc::new(self.geocoder.clone()),
            ResourceSources {
                weather: self.weather.source(),
                events: self.events.source(),
                movies: self.movies.source(),
                trails: self.trails.source(),
                listings: self.listings.source(),
            },
        )
    }
}
