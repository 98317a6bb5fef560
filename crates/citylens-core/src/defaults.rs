//! Centralized default constants for citylens.
//!
//! Provider endpoints, timeouts, and pool sizing live here so the provider,
//! database, and API crates agree on them.

// =============================================================================
// PROVIDER ENDPOINTS
// =============================================================================

/// Google Maps geocoding API host.
pub const GEOCODE_BASE_URL: &str = "https://maps.googleapis.com";

/// Dark Sky forecast API host.
pub const DARKSKY_BASE_URL: &str = "https://api.darksky.net";

/// Meetup API host.
pub const MEETUP_BASE_URL: &str = "https://api.meetup.com";

/// The Movie Database API host.
pub const MOVIE_BASE_URL: &str = "https://api.themoviedb.org";

/// Hiking Project API host.
pub const TRAIL_BASE_URL: &str = "https://www.hikingproject.com";

/// Yelp Fusion API host.
pub const YELP_BASE_URL: &str = "https://api.yelp.com";

/// CDN prefix for TMDb poster paths.
pub const MOVIE_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

// =============================================================================
// PROVIDER REQUEST PARAMETERS
// =============================================================================

/// Page size requested from Meetup's upcoming events search.
pub const MEETUP_PAGE_SIZE: u32 = 20;

/// Search radius (miles) for Hiking Project trails.
pub const TRAIL_MAX_DISTANCE: u32 = 10;

/// Timeout for a single provider request (seconds).
pub const PROVIDER_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Width of the truncated human-readable timestamp ("Tue Jul 24 2018").
pub const TRUNCATED_TIMESTAMP_LEN: usize = 15;

/// Width of the date portion of a provider "YYYY-MM-DD hh:mm:ss" string.
pub const CONDITION_DATE_LEN: usize = 10;

// =============================================================================
// SERVER
// =============================================================================

/// Default listen port.
pub const SERVER_PORT: u16 = 3000;

/// Default listen host.
pub const SERVER_HOST: &str = "0.0.0.0";
