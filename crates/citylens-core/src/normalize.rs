//! Raw provider shapes and their mapping into citylens records.
//!
//! Raw types mirror what each upstream API returns. Every field is optional
//! so a sparse item still maps; list envelopes default to empty so a payload
//! without its list is an empty success rather than an error.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::defaults::{CONDITION_DATE_LEN, MOVIE_IMAGE_BASE_URL, TRUNCATED_TIMESTAMP_LEN};
use crate::error::{Error, Result};
use crate::models::{
    BusinessListing, EventRecord, LocationRecord, MovieRecord, TrailRecord, WeatherRecord,
};
use crate::resource::{Resource, ResourceKind};

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// First fifteen characters of the long date form, e.g. "Tue Jul 24 2018".
///
/// This is a fixed-width slice, not calendar-aware formatting: everything is
/// rendered in UTC, so two instants on the same UTC day truncate identically.
pub fn truncate_timestamp(at: DateTime<Utc>) -> String {
    at.format("%a %b %d %Y %H:%M:%S")
        .to_string()
        .chars()
        .take(TRUNCATED_TIMESTAMP_LEN)
        .collect()
}

/// Truncated timestamp from Unix epoch seconds.
pub fn timestamp_from_epoch_secs(secs: i64) -> Result<String> {
    DateTime::from_timestamp(secs, 0)
        .map(truncate_timestamp)
        .ok_or_else(|| Error::Provider(format!("epoch seconds out of range: {}", secs)))
}

/// Truncated timestamp from Unix epoch milliseconds.
pub fn timestamp_from_epoch_millis(millis: i64) -> Result<String> {
    DateTime::from_timestamp_millis(millis)
        .map(truncate_timestamp)
        .ok_or_else(|| Error::Provider(format!("epoch millis out of range: {}", millis)))
}

/// Split "YYYY-MM-DD hh:mm:ss" into its date and time-of-day parts.
///
/// Fixed-width: the date is the first ten characters, the time everything
/// after the separator at position ten. Short input yields short parts.
pub fn split_condition_date(value: &str) -> (String, String) {
    let date = value.chars().take(CONDITION_DATE_LEN).collect();
    let time = value.chars().skip(CONDITION_DATE_LEN + 1).collect();
    (date, time)
}

// =============================================================================
// GEOCODING
// =============================================================================

/// Google geocoding response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeocodeResponse {
    pub results: Option<Vec<RawGeocodeResult>>,
    pub status: Option<String>,
    pub error_message: Option<String>,
}

impl RawGeocodeResponse {
    pub fn into_items(self) -> Vec<RawGeocodeResult> {
        self.results.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeocodeResult {
    pub formatted_address: Option<String>,
    pub geometry: Option<RawGeometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeometry {
    pub location: Option<RawLatLng>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawLatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LocationRecord {
    /// Build an unpersisted location from the first geocoding match.
    pub fn from_geocode(search_query: &str, raw: RawGeocodeResult) -> Result<Self> {
        let point = raw
            .geometry
            .and_then(|g| g.location)
            .ok_or_else(|| {
                Error::Provider(format!(
                    "geocoding result for '{}' has no geometry.location",
                    search_query
                ))
            })?;

        Ok(Self {
            id: None,
            search_query: search_query.to_string(),
            formatted_query: raw.formatted_address,
            latitude: point.lat,
            longitude: point.lng,
        })
    }
}

// =============================================================================
// WEATHER (Dark Sky)
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecastResponse {
    pub daily: Option<RawDailyForecast>,
}

impl RawForecastResponse {
    pub fn into_items(self) -> Vec<RawForecastDay> {
        self.daily.and_then(|d| d.data).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDailyForecast {
    pub data: Option<Vec<RawForecastDay>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecastDay {
    pub summary: Option<String>,
    /// Unix epoch seconds.
    pub time: Option<i64>,
}

impl Resource for WeatherRecord {
    type Raw = RawForecastDay;
    const KIND: ResourceKind = ResourceKind::Weather;

    fn normalize(raw: RawForecastDay) -> Result<Self> {
        let secs = raw
            .time
            .ok_or_else(|| Error::Provider("forecast day has no time".to_string()))?;
        Ok(Self {
            forecast: raw.summary,
            time: timestamp_from_epoch_secs(secs)?,
            location_id: None,
        })
    }

    fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    fn set_location_id(&mut self, location_id: i64) {
        self.location_id = Some(location_id);
    }
}

// =============================================================================
// EVENTS (Meetup)
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeetupResponse {
    pub events: Option<Vec<RawMeetupEvent>>,
}

impl RawMeetupResponse {
    pub fn into_items(self) -> Vec<RawMeetupEvent> {
        self.events.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeetupEvent {
    pub link: Option<String>,
    pub group: Option<RawMeetupGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeetupGroup {
    pub name: Option<String>,
    /// Unix epoch milliseconds.
    pub created: Option<i64>,
    pub who: Option<String>,
}

impl Resource for EventRecord {
    type Raw = RawMeetupEvent;
    const KIND: ResourceKind = ResourceKind::Events;

    fn normalize(raw: RawMeetupEvent) -> Result<Self> {
        let group = raw
            .group
            .ok_or_else(|| Error::Provider("meetup event has no group".to_string()))?;
        let created = group
            .created
            .ok_or_else(|| Error::Provider("meetup group has no created date".to_string()))?;

        Ok(Self {
            link: raw.link,
            name: group.name,
            creation_date: timestamp_from_epoch_millis(created)?,
            host: group.who,
            location_id: None,
        })
    }

    fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    fn set_location_id(&mut self, location_id: i64) {
        self.location_id = Some(location_id);
    }
}

// =============================================================================
// MOVIES (TMDb)
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovieResponse {
    pub results: Option<Vec<RawMovie>>,
}

impl RawMovieResponse {
    pub fn into_items(self) -> Vec<RawMovie> {
        self.results.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovie {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub popularity: Option<f64>,
    pub release_date: Option<String>,
}

impl Resource for MovieRecord {
    type Raw = RawMovie;
    const KIND: ResourceKind = ResourceKind::Movies;

    fn normalize(raw: RawMovie) -> Result<Self> {
        Ok(Self {
            title: raw.title,
            overview: raw.overview,
            average_votes: raw.vote_average,
            total_votes: raw.vote_count,
            image_url: raw
                .poster_path
                .map(|path| format!("{}{}", MOVIE_IMAGE_BASE_URL, path)),
            popularity: raw.popularity,
            released_on: raw.release_date,
            location_id: None,
        })
    }

    fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    fn set_location_id(&mut self, location_id: i64) {
        self.location_id = Some(location_id);
    }
}

// =============================================================================
// TRAILS (Hiking Project)
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrailResponse {
    pub trails: Option<Vec<RawTrail>>,
}

impl RawTrailResponse {
    pub fn into_items(self) -> Vec<RawTrail> {
        self.trails.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrail {
    pub name: Option<String>,
    pub location: Option<String>,
    pub length: Option<f64>,
    pub stars: Option<f64>,
    pub star_votes: Option<i64>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub condition_details: Option<String>,
    /// "YYYY-MM-DD hh:mm:ss"
    pub condition_date: Option<String>,
}

impl Resource for TrailRecord {
    type Raw = RawTrail;
    const KIND: ResourceKind = ResourceKind::Trails;

    fn normalize(raw: RawTrail) -> Result<Self> {
        let condition = raw
            .condition_date
            .ok_or_else(|| Error::Provider("trail has no conditionDate".to_string()))?;
        let (condition_date, condition_time) = split_condition_date(&condition);

        Ok(Self {
            name: raw.name,
            location: raw.location,
            length: raw.length,
            stars: raw.stars,
            star_votes: raw.star_votes,
            summary: raw.summary,
            trail_url: raw.url,
            conditions: raw.condition_details,
            condition_date,
            condition_time,
            location_id: None,
        })
    }

    fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    fn set_location_id(&mut self, location_id: i64) {
        self.location_id = Some(location_id);
    }
}

// =============================================================================
// LISTINGS (Yelp)
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBusinessResponse {
    pub businesses: Option<Vec<RawBusiness>>,
}

impl RawBusinessResponse {
    pub fn into_items(self) -> Vec<RawBusiness> {
        self.businesses.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBusiness {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub url: Option<String>,
}

impl Resource for BusinessListing {
    type Raw = RawBusiness;
    const KIND: ResourceKind = ResourceKind::Listings;

    fn normalize(raw: RawBusiness) -> Result<Self> {
        Ok(Self {
            name: raw.name,
            image_url: raw.image_url,
            price: raw.price,
            rating: raw.rating,
            url: raw.url,
            location_id: None,
        })
    }

    fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    fn set_location_id(&mut self, location_id: i64) {
        self.location_id = Some(location_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_timestamp_is_fifteen_chars() {
        // 2018-07-24T16:00:00Z
        let formatted = timestamp_from_epoch_secs(1_532_448_000).unwrap();
        assert_eq!(formatted, "Tue Jul 24 2018");
        assert_eq!(formatted.chars().count(), TRUNCATED_TIMESTAMP_LEN);
    }

    #[test]
    fn test_truncation_ignores_time_of_day() {
        let morning = timestamp_from_epoch_secs(1_532_390_400).unwrap(); // 00:00 UTC
        let night = timestamp_from_epoch_secs(1_532_476_799).unwrap(); // 23:59:59 UTC
        assert_eq!(morning, night);
    }

    #[test]
    fn test_millis_and_secs_agree() {
        assert_eq!(
            timestamp_from_epoch_millis(1_532_448_000_000).unwrap(),
            timestamp_from_epoch_secs(1_532_448_000).unwrap()
        );
    }

    #[test]
    fn test_out_of_range_epoch_is_provider_error() {
        assert!(matches!(
            timestamp_from_epoch_secs(i64::MAX),
            Err(Error::Provider(_))
        ));
    }

    #[test]
    fn test_split_condition_date() {
        let (date, time) = split_condition_date("2018-07-21 11:03:12");
        assert_eq!(date, "2018-07-21");
        assert_eq!(time, "11:03:12");
    }

    #[test]
    fn test_split_condition_date_short_input() {
        let (date, time) = split_condition_date("1970");
        assert_eq!(date, "1970");
        assert_eq!(time, "");
    }

    #[test]
    fn test_location_from_geocode() {
        let raw: RawGeocodeResponse = serde_json::from_value(json!({
            "results": [{
                "formatted_address": "Seattle, WA, USA",
                "geometry": { "location": { "lat": 47.6062095, "lng": -122.3320708 } }
            }],
            "status": "OK"
        }))
        .unwrap();
        let first = raw.into_items().into_iter().next().unwrap();

        let location = LocationRecord::from_geocode("seattle", first).unwrap();
        assert_eq!(location.id, None);
        assert_eq!(location.search_query, "seattle");
        assert_eq!(location.formatted_query.as_deref(), Some("Seattle, WA, USA"));
        assert_eq!(location.latitude, 47.6062095);
        assert_eq!(location.longitude, -122.3320708);
    }

    #[test]
    fn test_location_without_geometry_fails() {
        let raw = RawGeocodeResult {
            formatted_address: Some("Nowhere".to_string()),
            geometry: None,
        };
        assert!(matches!(
            LocationRecord::from_geocode("nowhere", raw),
            Err(Error::Provider(_))
        ));
    }

    #[test]
    fn test_geocode_zero_results() {
        let raw: RawGeocodeResponse =
            serde_json::from_value(json!({ "results": [], "status": "ZERO_RESULTS" })).unwrap();
        assert!(raw.into_items().is_empty());
    }

    #[test]
    fn test_movie_normalization_fidelity() {
        let raw: RawMovie = serde_json::from_value(json!({
            "title": "Sleepless in Seattle",
            "overview": "A widowed architect...",
            "vote_average": 7.5,
            "vote_count": 1200,
            "poster_path": "/abc.jpg",
            "popularity": 12.25,
            "release_date": "1993-06-24"
        }))
        .unwrap();

        let movie = MovieRecord::normalize(raw).unwrap();
        assert_eq!(
            movie.image_url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/abc.jpg")
        );
        assert_eq!(movie.average_votes, Some(7.5));
        assert_eq!(movie.total_votes, Some(1200));
        assert_eq!(movie.released_on.as_deref(), Some("1993-06-24"));
        assert_eq!(movie.location_id, None);
    }

    #[test]
    fn test_movie_without_poster_has_no_image() {
        let movie = MovieRecord::normalize(RawMovie::default()).unwrap();
        assert_eq!(movie.image_url, None);
        assert_eq!(movie.title, None);
    }

    #[test]
    fn test_weather_normalization() {
        let raw: RawForecastResponse = serde_json::from_value(json!({
            "daily": { "data": [
                { "summary": "Light rain in the morning.", "time": 1_532_448_000 },
                { "summary": "Clear throughout the day.", "time": 1_532_534_400 }
            ]}
        }))
        .unwrap();

        let days: Vec<_> = raw
            .into_items()
            .into_iter()
            .map(WeatherRecord::normalize)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].forecast.as_deref(), Some("Light rain in the morning."));
        assert_eq!(days[0].time, "Tue Jul 24 2018");
        assert_eq!(days[1].time, "Wed Jul 25 2018");
    }

    #[test]
    fn test_weather_missing_daily_is_empty() {
        let raw: RawForecastResponse = serde_json::from_value(json!({ "currently": {} })).unwrap();
        assert!(raw.into_items().is_empty());
    }

    #[test]
    fn test_weather_without_time_fails() {
        let raw = RawForecastDay {
            summary: Some("Foggy".to_string()),
            time: None,
        };
        assert!(WeatherRecord::normalize(raw).is_err());
    }

    #[test]
    fn test_event_normalization() {
        let raw: RawMeetupEvent = serde_json::from_value(json!({
            "link": "https://www.meetup.com/seattle-rust/events/1/",
            "group": {
                "name": "Seattle Rust Meetup",
                "created": 1_532_448_000_000_i64,
                "who": "Rustaceans"
            }
        }))
        .unwrap();

        let event = EventRecord::normalize(raw).unwrap();
        assert_eq!(event.name.as_deref(), Some("Seattle Rust Meetup"));
        assert_eq!(event.host.as_deref(), Some("Rustaceans"));
        assert_eq!(event.creation_date, "Tue Jul 24 2018");
    }

    #[test]
    fn test_event_without_group_fails() {
        let raw = RawMeetupEvent {
            link: Some("https://example.com".to_string()),
            group: None,
        };
        assert!(matches!(EventRecord::normalize(raw), Err(Error::Provider(_))));
    }

    #[test]
    fn test_trail_normalization() {
        let raw: RawTrail = serde_json::from_value(json!({
            "name": "Rattlesnake Ledge",
            "location": "North Bend, Washington",
            "length": 5.3,
            "stars": 4.4,
            "starVotes": 87,
            "summary": "A popular hike",
            "url": "https://www.hikingproject.com/trail/7000130",
            "conditionDetails": "Dry",
            "conditionDate": "2018-07-21 11:03:12"
        }))
        .unwrap();

        let trail = TrailRecord::normalize(raw).unwrap();
        assert_eq!(trail.star_votes, Some(87));
        assert_eq!(trail.trail_url.as_deref(), Some("https://www.hikingproject.com/trail/7000130"));
        assert_eq!(trail.conditions.as_deref(), Some("Dry"));
        assert_eq!(trail.condition_date, "2018-07-21");
        assert_eq!(trail.condition_time, "11:03:12");
    }

    #[test]
    fn test_trail_without_condition_date_fails() {
        assert!(TrailRecord::normalize(RawTrail::default()).is_err());
    }

    #[test]
    fn test_listing_normalization() {
        let raw: RawBusinessResponse = serde_json::from_value(json!({
            "businesses": [{
                "name": "Pike Place Chowder",
                "image_url": "https://s3-media1.fl.yelpcdn.com/bphoto/x/o.jpg",
                "price": "$$",
                "rating": 4.5,
                "url": "https://www.yelp.com/biz/pike-place-chowder-seattle"
            }]
        }))
        .unwrap();

        let listing = BusinessListing::normalize(raw.into_items().remove(0)).unwrap();
        assert_eq!(listing.price.as_deref(), Some("$$"));
        assert_eq!(listing.rating, Some(4.5));
    }

    #[test]
    fn test_null_list_is_empty() {
        let raw: RawBusinessResponse = serde_json::from_value(json!({ "businesses": null })).unwrap();
        assert!(raw.into_items().is_empty());
    }

    #[test]
    fn test_set_location_id() {
        let mut listing = BusinessListing::normalize(RawBusiness::default()).unwrap();
        assert_eq!(Resource::location_id(&listing), None);
        listing.set_location_id(42);
        assert_eq!(Resource::location_id(&listing), Some(42));
    }
}
