//! # citylens-providers
//!
//! HTTP clients for the external data sources citylens aggregates.
//!
//! Each client implements one provider trait from `citylens-core`
//! ([`Geocoder`](citylens_core::Geocoder) or
//! [`ResourceProvider`](citylens_core::ResourceProvider)) and returns raw
//! provider items; normalization happens in the resolver.

pub mod client;
pub mod config;
pub mod events;
pub mod geocode;
pub mod listings;
pub mod movies;
pub mod trails;
pub mod weather;

use std::sync::Arc;

use tracing::info;

use citylens_core::Result;

pub use client::{build_http_client, get_json};
pub use config::{ProviderConfig, ProviderEndpoint};
pub use events::MeetupClient;
pub use geocode::GoogleGeocoder;
pub use listings::YelpClient;
pub use movies::TmdbClient;
pub use trails::HikingProjectClient;
pub use weather::DarkSkyClient;

/// Every provider client, sharing one HTTP connection pool.
#[derive(Clone)]
pub struct Providers {
    pub geocoder: Arc<GoogleGeocoder>,
    pub weather: Arc<DarkSkyClient>,
    pub events: Arc<MeetupClient>,
    pub movies: Arc<TmdbClient>,
    pub trails: Arc<HikingProjectClient>,
    pub listings: Arc<YelpClient>,
}

impl Providers {
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let http = build_http_client(config.timeout_secs)?;

        info!(
            subsystem = "providers",
            op = "init",
            timeout_secs = config.timeout_secs,
            geocode = %config.geocode.base_url,
            weather = %config.weather.base_url,
            events = %config.events.base_url,
            movies = %config.movies.base_url,
            trails = %config.trails.base_url,
            listings = %config.listings.base_url,
            "Provider clients initialized"
        );

        Ok(Self {
            geocoder: Arc::new(GoogleGeocoder::new(http.clone(), config.geocode.clone())),
            weather: Arc::new(DarkSkyClient::new(http.clone(), config.weather.clone())),
            events: Arc::new(MeetupClient::new(http.clone(), config.events.clone())),
            movies: Arc::new(TmdbClient::new(http.clone(), config.movies.clone())),
            trails: Arc::new(HikingProjectClient::new(http.clone(), config.trails.clone())),
            listings: Arc::new(YelpClient::new(http, config.listings.clone())),
        })
    }

    /// Build clients from environment configuration.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ProviderConfig::from_env()?)
    }
}
