//! # citylens-api
//!
//! HTTP surface for citylens: location lookup plus the five cached resource
//! routes, built as an axum [`Router`] over a [`Resolver`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod query;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use citylens_core::{BusinessListing, EventRecord, MovieRecord, TrailRecord, WeatherRecord};
use citylens_db::Database;
use citylens_providers::Providers;
use citylens_resolver::{ResourceSource, ResourceSources, Resolver};

pub use config::{AppConfig, ServerConfig};
pub use error::{ApiError, GENERIC_ERROR_MESSAGE};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE AND ROUTER
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}

impl AppState {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

/// Wire the PostgreSQL repositories and HTTP provider clients into a resolver.
pub fn build_resolver(db: &Database, providers: &Providers) -> Resolver {
    Resolver::new(
        Arc::new(db.locations.clone()),
        providers.geocoder.clone(),
        ResourceSources {
            weather: ResourceSource::<WeatherRecord>::new(
                Arc::new(db.weather.clone()),
                providers.weather.clone(),
            ),
            events: ResourceSource::<EventRecord>::new(
                Arc::new(db.events.clone()),
                providers.events.clone(),
            ),
            movies: ResourceSource::<MovieRecord>::new(
                Arc::new(db.movies.clone()),
                providers.movies.clone(),
            ),
            trails: ResourceSource::<TrailRecord>::new(
                Arc::new(db.trails.clone()),
                providers.trails.clone(),
            ),
            listings: ResourceSource::<BusinessListing>::new(
                Arc::new(db.listings.clone()),
                providers.listings.clone(),
            ),
        },
    )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/location", get(handlers::location::get_location))
        .route("/weather", get(handlers::resources::get_weather))
        .route("/meetups", get(handlers::resources::get_meetups))
        .route("/movies", get(handlers::resources::get_movies))
        .route("/trails", get(handlers::resources::get_trails))
        .route("/yelp", get(handlers::resources::get_yelp))
        .route("/health", get(handlers::system::health_check))
        .route("/openapi.json", get(handlers::system::openapi_json))
        // Middleware
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
