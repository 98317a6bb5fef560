//! Location-scoped resource endpoints.
//!
//! Every route takes the location in `data` (JSON or bracket form) and
//! returns the resolved records as a JSON array. Whether they came from the
//! store or the provider is not visible to the caller.

use axum::{
    extract::{Query, State},
    Json,
};
use citylens_core::{
    BusinessListing, EventRecord, MovieRecord, Resource, TrailRecord, WeatherRecord,
};
use citylens_resolver::{ResourceSources, SourceOf};

use crate::query::{location_param, QueryParams};
use crate::{ApiError, AppState};

async fn resolve_records<R>(state: &AppState, params: &QueryParams) -> Result<Json<Vec<R>>, ApiError>
where
    R: Resource,
    ResourceSources: SourceOf<R>,
{
    let location = location_param(params)?;
    let resolution = state.resolver.resolve::<R>(&location).await?;

    Ok(Json(resolution.into_records()))
}

/// Daily forecasts for a location.
#[utoipa::path(
    get,
    path = "/weather",
    tag = "Resources",
    params(("data" = String, Query, description = "Location as JSON: id, latitude, longitude")),
    responses(
        (status = 200, description = "Daily forecasts", body = [WeatherRecord]),
        (status = 400, description = "Missing id or coordinates"),
        (status = 502, description = "Provider failed")
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<WeatherRecord>>, ApiError> {
    resolve_records(&state, &params).await
}

/// Upcoming meetups near a location.
#[utoipa::path(
    get,
    path = "/meetups",
    tag = "Resources",
    params(("data" = String, Query, description = "Location as JSON: id, latitude, longitude")),
    responses(
        (status = 200, description = "Upcoming events", body = [EventRecord]),
        (status = 400, description = "Missing id or coordinates"),
        (status = 502, description = "Provider failed")
    )
)]
pub async fn get_meetups(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    resolve_records(&state, &params).await
}

/// Movies matching the location's search query.
#[utoipa::path(
    get,
    path = "/movies",
    tag = "Resources",
    params(("data" = String, Query, description = "Location as JSON: id, search_query")),
    responses(
        (status = 200, description = "Matching movies", body = [MovieRecord]),
        (status = 400, description = "Missing id or search query"),
        (status = 502, description = "Provider failed")
    )
)]
pub async fn get_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<MovieRecord>>, ApiError> {
    resolve_records(&state, &params).await
}

/// Hiking trails near a location.
#[utoipa::path(
    get,
    path = "/trails",
    tag = "Resources",
    params(("data" = String, Query, description = "Location as JSON: id, latitude, longitude")),
    responses(
        (status = 200, description = "Nearby trails", body = [TrailRecord]),
        (status = 400, description = "Missing id or coordinates"),
        (status = 502, description = "Provider failed")
    )
)]
pub async fn get_trails(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<TrailRecord>>, ApiError> {
    resolve_records(&state, &params).await
}

/// Business listings for the location's search query.
#[utoipa::path(
    get,
    path = "/yelp",
    tag = "Resources",
    params(("data" = String, Query, description = "Location as JSON: id, search_query")),
    responses(
        (status = 200, description = "Business listings", body = [BusinessListing]),
        (status = 400, description = "Missing id or search query"),
        (status = 502, description = "Provider failed")
    )
)]
pub async fn get_yelp(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<BusinessListing>>, ApiError> {
    resolve_records(&state, &params).await
}
