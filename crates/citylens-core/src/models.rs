//! Record shapes shared by the store, the resolver, and the HTTP layer.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// LOCATION
// =============================================================================

/// A geocoded search query.
///
/// `id` is `None` until the store assigns one on first insert; after that it
/// never changes and is the foreign key for every resource table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct LocationRecord {
    pub id: Option<i64>,
    /// The free-text query exactly as the caller sent it.
    pub search_query: String,
    /// Provider-formatted address for the first geocoding match.
    pub formatted_query: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationRecord {
    /// Reference to this location for resource resolution.
    ///
    /// Fails with `InvalidInput` if the record has not been persisted yet.
    pub fn to_ref(&self) -> Result<LocationRef> {
        let id = self.id.ok_or_else(|| {
            Error::InvalidInput(format!(
                "location '{}' has no assigned id",
                self.search_query
            ))
        })?;
        Ok(LocationRef {
            id,
            search_query: Some(self.search_query.clone()),
            latitude: Some(self.latitude),
            longitude: Some(self.longitude),
        })
    }
}

/// The location parameters a caller passes back on resource requests.
///
/// Only `id` is needed for a cache hit; a miss needs coordinates or the
/// search query depending on the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LocationRef {
    pub id: i64,
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl LocationRef {
    /// Reference carrying only the location id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            search_query: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Set coordinates.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Set the free-text search query.
    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    /// `(latitude, longitude)`, or `InvalidInput` if either is missing.
    pub fn coordinates(&self) -> Result<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Ok((lat, lng)),
            _ => Err(Error::InvalidInput(format!(
                "location {} requires latitude and longitude",
                self.id
            ))),
        }
    }

    /// Non-empty search query, or `InvalidInput`.
    pub fn search_query(&self) -> Result<&str> {
        self.search_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| {
                Error::InvalidInput(format!("location {} requires search_query", self.id))
            })
    }
}

// =============================================================================
// RESOURCE RECORDS
// =============================================================================

/// One daily forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct WeatherRecord {
    pub forecast: Option<String>,
    /// Truncated human-readable day, e.g. "Tue Jul 24 2018".
    pub time: String,
    pub location_id: Option<i64>,
}

/// An upcoming meetup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct EventRecord {
    pub link: Option<String>,
    pub name: Option<String>,
    pub creation_date: String,
    pub host: Option<String>,
    pub location_id: Option<i64>,
}

/// A movie matching the location's search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct MovieRecord {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub average_votes: Option<f64>,
    pub total_votes: Option<i64>,
    pub image_url: Option<String>,
    pub popularity: Option<f64>,
    pub released_on: Option<String>,
    pub location_id: Option<i64>,
}

/// A hiking trail near the location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct TrailRecord {
    pub name: Option<String>,
    pub location: Option<String>,
    pub length: Option<f64>,
    pub stars: Option<f64>,
    pub star_votes: Option<i64>,
    pub summary: Option<String>,
    pub trail_url: Option<String>,
    pub conditions: Option<String>,
    pub condition_date: String,
    pub condition_time: String,
    pub location_id: Option<i64>,
}

/// A business listing for the location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct BusinessListing {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub url: Option<String>,
    pub location_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seattle() -> LocationRecord {
        LocationRecord {
            id: Some(7),
            search_query: "seattle".to_string(),
            formatted_query: Some("Seattle, WA, USA".to_string()),
            latitude: 47.6062,
            longitude: -122.3321,
        }
    }

    #[test]
    fn test_to_ref_carries_every_lookup_parameter() {
        let location_ref = seattle().to_ref().unwrap();
        assert_eq!(location_ref.id, 7);
        assert_eq!(location_ref.coordinates().unwrap(), (47.6062, -122.3321));
        assert_eq!(location_ref.search_query().unwrap(), "seattle");
    }

    #[test]
    fn test_to_ref_requires_id() {
        let mut location = seattle();
        location.id = None;
        assert!(matches!(location.to_ref(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_missing_coordinates_is_invalid_input() {
        let location_ref = LocationRef::new(1).with_search_query("lynnwood");
        assert!(matches!(
            location_ref.coordinates(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_blank_search_query_is_invalid_input() {
        let location_ref = LocationRef::new(1).with_search_query("   ");
        assert!(location_ref.search_query().is_err());
    }

    #[test]
    fn test_location_ref_ignores_unknown_fields() {
        let json = r#"{"id":3,"search_query":"tacoma","formatted_query":"Tacoma, WA","latitude":47.25,"longitude":-122.44}"#;
        let location_ref: LocationRef = serde_json::from_str(json).unwrap();
        assert_eq!(location_ref.id, 3);
        assert_eq!(location_ref.latitude, Some(47.25));
    }

    #[test]
    fn test_location_ref_only_id() {
        let location_ref: LocationRef = serde_json::from_str(r#"{"id":9}"#).unwrap();
        assert_eq!(location_ref, LocationRef::new(9));
    }
}
