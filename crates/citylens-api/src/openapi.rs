use utoipa::OpenApi;

use citylens_core::{
    BusinessListing, EventRecord, LocationRecord, LocationRef, MovieRecord, TrailRecord,
    WeatherRecord,
};

use crate::handlers;

/// OpenAPI document served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "citylens API",
        description = "Location lookup with cached weather, events, movies, trails and business listings"
    ),
    paths(
        handlers::location::get_location,
        handlers::resources::get_weather,
        handlers::resources::get_meetups,
        handlers::resources::get_movies,
        handlers::resources::get_trails,
        handlers::resources::get_yelp,
        handlers::system::health_check,
    ),
    components(schemas(
        LocationRecord,
        LocationRef,
        WeatherRecord,
        EventRecord,
        MovieRecord,
        TrailRecord,
        BusinessListing,
    )),
    tags(
        (name = "Locations", description = "Search query to location identity"),
        (name = "Resources", description = "Location-scoped cached resources"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
