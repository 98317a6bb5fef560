//! Google Maps forward geocoding.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use citylens_core::{Error, Geocoder, RawGeocodeResponse, RawGeocodeResult, Result};

use crate::client::get_json;
use crate::config::ProviderEndpoint;

const PROVIDER: &str = "google_geocode";

/// Statuses Google uses for a request that was understood.
const OK_STATUSES: [&str; 2] = ["OK", "ZERO_RESULTS"];

pub struct GoogleGeocoder {
    http: Client,
    endpoint: ProviderEndpoint,
}

impl GoogleGeocoder {
    pub fn new(http: Client, endpoint: ProviderEndpoint) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<RawGeocodeResult>> {
        let request = self
            .http
            .get(self.endpoint.url("/maps/api/geocode/json"))
            .query(&[("address", query), ("key", self.endpoint.api_key.as_str())]);

        let body: RawGeocodeResponse = get_json(PROVIDER, request).await?;

        // Google reports quota and key problems in-band with a 200.
        if let Some(status) = body.status.as_deref() {
            if !OK_STATUSES.contains(&status) {
                return Err(Error::Provider(format!(
                    "{} status {}: {}",
                    PROVIDER,
                    status,
                    body.error_message.as_deref().unwrap_or("no message")
                )));
            }
        }

        let results = body.into_items();
        debug!(
            subsystem = "providers",
            component = PROVIDER,
            result_count = results.len(),
            "Geocoded query"
        );
        Ok(results)
    }
}
