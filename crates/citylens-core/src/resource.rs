//! Resource descriptors for the generic cache-aside routine.
//!
//! Each cached resource kind is described once: its table, its columns, the
//! raw provider item it is built from, and how the location id is attached.
//! The resolver and the PostgreSQL repository are written against
//! [`Resource`] and never name a concrete record type.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which provider input a resource kind needs on a cache miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    /// Latitude and longitude.
    Coordinates,
    /// The location's free-text search query.
    SearchQuery,
}

/// The five location-scoped resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Weather,
    Events,
    Movies,
    Trails,
    Listings,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Weather,
        ResourceKind::Events,
        ResourceKind::Movies,
        ResourceKind::Trails,
        ResourceKind::Listings,
    ];

    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            ResourceKind::Weather => "weathers",
            ResourceKind::Events => "meetups",
            ResourceKind::Movies => "movies",
            ResourceKind::Trails => "trails",
            ResourceKind::Listings => "yelps",
        }
    }

    /// Data columns in insert order, excluding `id` and `location_id`.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Weather => &["forecast", "time"],
            ResourceKind::Events => &["link", "name", "creation_date", "host"],
            ResourceKind::Movies => &[
                "title",
                "overview",
                "average_votes",
                "total_votes",
                "image_url",
                "popularity",
                "released_on",
            ],
            ResourceKind::Trails => &[
                "name",
                "location",
                "length",
                "stars",
                "star_votes",
                "summary",
                "trail_url",
                "conditions",
                "condition_date",
                "condition_time",
            ],
            ResourceKind::Listings => &["name", "image_url", "price", "rating", "url"],
        }
    }

    /// HTTP route segment serving this kind.
    pub fn route(self) -> &'static str {
        match self {
            ResourceKind::Weather => "weather",
            ResourceKind::Events => "meetups",
            ResourceKind::Movies => "movies",
            ResourceKind::Trails => "trails",
            ResourceKind::Listings => "yelp",
        }
    }

    /// Provider input needed on a cache miss.
    pub fn lookup_key(self) -> LookupKey {
        match self {
            ResourceKind::Weather | ResourceKind::Events | ResourceKind::Trails => {
                LookupKey::Coordinates
            }
            ResourceKind::Movies | ResourceKind::Listings => LookupKey::SearchQuery,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Weather => "weather",
            ResourceKind::Events => "events",
            ResourceKind::Movies => "movies",
            ResourceKind::Trails => "trails",
            ResourceKind::Listings => "listings",
        };
        f.write_str(name)
    }
}

/// A location-scoped record that can be fetched, normalized, and cached.
pub trait Resource: Serialize + Clone + Send + Sync + Unpin + 'static {
    /// One item of the provider's response.
    type Raw: DeserializeOwned + Send + 'static;

    /// Kind descriptor (table, columns, route).
    const KIND: ResourceKind;

    /// Map a raw provider item into the record shape.
    ///
    /// Missing optional fields become `None`; only a missing field the
    /// mapping cannot do without yields `Error::Provider`.
    fn normalize(raw: Self::Raw) -> Result<Self>;

    /// Location this record belongs to, once attached.
    fn location_id(&self) -> Option<i64>;

    /// Attach the resolved location id.
    fn set_location_id(&mut self, location_id: i64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_match_schema() {
        let tables: Vec<_> = ResourceKind::ALL.iter().map(|k| k.table()).collect();
        assert_eq!(tables, vec!["weathers", "meetups", "movies", "trails", "yelps"]);
    }

    #[test]
    fn test_lookup_keys() {
        assert_eq!(ResourceKind::Weather.lookup_key(), LookupKey::Coordinates);
        assert_eq!(ResourceKind::Events.lookup_key(), LookupKey::Coordinates);
        assert_eq!(ResourceKind::Trails.lookup_key(), LookupKey::Coordinates);
        assert_eq!(ResourceKind::Movies.lookup_key(), LookupKey::SearchQuery);
        assert_eq!(ResourceKind::Listings.lookup_key(), LookupKey::SearchQuery);
    }

    #[test]
    fn test_columns_never_include_keys() {
        for kind in ResourceKind::ALL {
            assert!(!kind.columns().contains(&"id"));
            assert!(!kind.columns().contains(&"location_id"));
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&ResourceKind::Listings).unwrap(),
            "\"listings\""
        );
        assert_eq!(ResourceKind::Events.to_string(), "events");
        assert_eq!(ResourceKind::Listings.route(), "yelp");
    }
}
