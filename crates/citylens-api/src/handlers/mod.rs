//! HTTP handlers for citylens-api.

pub mod location;
pub mod resources;
pub mod system;
