//! Location identity endpoint.

use axum::{
    extract::{Query, State},
    Json,
};

use citylens_core::LocationRecord;

use crate::query::{search_query_param, QueryParams};
use crate::{ApiError, AppState};

/// Resolve a free-text search query to a stored, geocoded location.
///
/// The first request for a query geocodes and stores it; later requests
/// return the stored record with the same id.
#[utoipa::path(
    get,
    path = "/location",
    tag = "Locations",
    params(("data" = String, Query, description = "Free-text search query")),
    responses(
        (status = 200, description = "Resolved location", body = LocationRecord),
        (status = 400, description = "Missing or blank query"),
        (status = 502, description = "Geocoding failed or found nothing")
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<LocationRecord>, ApiError> {
    let query = search_query_param(&params)?;
    let location = state.resolver.resolve_location(&query).await?;
    Ok(Json(location))
}
