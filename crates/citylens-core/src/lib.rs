//! # citylens-core
//!
//! Core types, traits, and abstractions for citylens.
//!
//! This crate holds the record shapes, the raw provider shapes and the
//! normalizers between them, the [`Resource`] descriptor used by the generic
//! cache-aside routine, and the store/provider traits the resolver depends on.

pub mod defaults;
pub mod error;
pub mod models;
pub mod normalize;
pub mod resource;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use normalize::{
    split_condition_date, timestamp_from_epoch_millis, timestamp_from_epoch_secs,
    truncate_timestamp, RawBusiness, RawBusinessResponse, RawForecastDay, RawForecastResponse,
    RawGeocodeResponse, RawGeocodeResult, RawMeetupEvent, RawMeetupResponse, RawMovie,
    RawMovieResponse, RawTrail, RawTrailResponse,
};
pub use resource::{LookupKey, Resource, ResourceKind};
pub use traits::*;
