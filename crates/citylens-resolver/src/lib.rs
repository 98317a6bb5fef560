//! # citylens-resolver
//!
//! Location identity and cache-aside resolution of location-scoped
//! resources.
//!
//! The [`Resolver`] depends only on the store and provider traits from
//! `citylens-core`; the server wires it to PostgreSQL and the HTTP clients,
//! tests wire it to the doubles in [`testing`].
//!
//! ## Example
//!
//! ```rust,ignore
//! let location = resolver.resolve_location("seattle").await?;
//! let forecasts = resolver.weather(&location.to_ref()?).await?;
//! println!("{} forecasts from {}", forecasts.records.len(), forecasts.source);
//! ```

pub mod cache;
pub mod report;
pub mod testing;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use citylens_core::{
    BusinessListing, Error, EventRecord, Geocoder, LocationRecord, LocationRef, LocationStore,
    MovieRecord, Resource, Result, TrailRecord, WeatherRecord,
};

pub use cache::{resolve_resource, ResourceSource};
pub use report::{BatchWriteReport, PendingWrites, Resolution, Source, WriteOutcome};

/// One [`ResourceSource`] per resource kind.
#[derive(Clone)]
pub struct ResourceSources {
    pub weather: ResourceSource<WeatherRecord>,
    pub events: ResourceSource<EventRecord>,
    pub movies: ResourceSource<MovieRecord>,
    pub trails: ResourceSource<TrailRecord>,
    pub listings: ResourceSource<BusinessListing>,
}

/// Selects the source for a resource type, so callers can stay generic.
pub trait SourceOf<R: Resource> {
    fn source_of(&self) -> &ResourceSource<R>;
}

impl SourceOf<WeatherRecord> for ResourceSources {
    fn source_of(&self) -> &ResourceSource<WeatherRecord> {
        &self.weather
    }
}

impl SourceOf<EventRecord> for ResourceSources {
    fn source_of(&self) -> &ResourceSource<EventRecord> {
        &self.events
    }
}

impl SourceOf<MovieRecord> for ResourceSources {
    fn source_of(&self) -> &ResourceSource<MovieRecord> {
        &self.movies
    }
}

impl SourceOf<TrailRecord> for ResourceSources {
    fn source_of(&self) -> &ResourceSource<TrailRecord> {
        &self.trails
    }
}

impl SourceOf<BusinessListing> for ResourceSources {
    fn source_of(&self) -> &ResourceSource<BusinessListing> {
        &self.listings
    }
}

/// Resolves search queries to locations and locations to resources.
#[derive(Clone)]
pub struct Resolver {
    locations: Arc<dyn LocationStore>,
    geocoder: Arc<dyn Geocoder>,
    sources: ResourceSources,
}

impl Resolver {
    pub fn new(
        locations: Arc<dyn LocationStore>,
        geocoder: Arc<dyn Geocoder>,
        sources: ResourceSources,
    ) -> Self {
        Self {
            locations,
            geocoder,
            sources,
        }
    }

    /// Look up a stored location by exact query, geocoding and storing it on
    /// first sight.
    ///
    /// Fails with `InvalidInput` for a blank query and `Provider` when the
    /// geocoder finds nothing; nothing is stored in either case.
    pub async fn resolve_location(&self, query: &str) -> Result<LocationRecord> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput(
                "search query must not be empty".to_string(),
            ));
        }

        if let Some(existing) = self.locations.find_by_query(query).await? {
            debug!(
                subsystem = "resolver",
                op = "resolve_location",
                location_id = ?existing.id,
                source = "cache",
                "Location found"
            );
            return Ok(existing);
        }

        let start = Instant::now();
        let first = self
            .geocoder
            .geocode(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Provider(format!("no geocoding results for '{}'", query)))?;

        let geocoded = LocationRecord::from_geocode(query, first)?;
        let location = self.locations.insert(&geocoded).await?;

        info!(
            subsystem = "resolver",
            op = "resolve_location",
            location_id = ?location.id,
            source = "provider",
            duration_ms = start.elapsed().as_millis() as u64,
            "Location geocoded and stored"
        );
        Ok(location)
    }

    /// Resolve any resource kind.
    pub async fn resolve<R: Resource>(&self, location: &LocationRef) -> Result<Resolution<R>>
    where
        ResourceSources: SourceOf<R>,
    {
        resolve_resource(self.sources.source_of(), location).await
    }

    pub async fn weather(&self, location: &LocationRef) -> Result<Resolution<WeatherRecord>> {
        self.resolve(location).await
    }

    pub async fn events(&self, location: &LocationRef) -> Result<Resolution<EventRecord>> {
        self.resolve(location).await
    }

    pub async fn movies(&self, location: &LocationRef) -> Result<Resolution<MovieRecord>> {
        self.resolve(location).await
    }

    pub async fn trails(&self, location: &LocationRef) -> Result<Resolution<TrailRecord>> {
        self.resolve(location).await
    }

    pub async fn listings(&self, location: &LocationRef) -> Result<Resolution<BusinessListing>> {
        self.resolve(location).await
    }
}
