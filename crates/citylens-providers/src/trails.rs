//! Hiking Project trails within a fixed radius.

use async_trait::async_trait;
use reqwest::Client;

use citylens_core::defaults::TRAIL_MAX_DISTANCE;
use citylens_core::{LocationRef, RawTrail, RawTrailResponse, ResourceProvider, Result, TrailRecord};

use crate::client::get_json;
use crate::config::ProviderEndpoint;

const PROVIDER: &str = "hiking_project";

pub struct HikingProjectClient {
    http: Client,
    endpoint: ProviderEndpoint,
}

impl HikingProjectClient {
    pub fn new(http: Client, endpoint: ProviderEndpoint) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ResourceProvider<TrailRecord> for HikingProjectClient {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<RawTrail>> {
        let (lat, lng) = location.coordinates()?;
        let request = self
            .http
            .get(self.endpoint.url("/data/get-trails"))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("maxDistance", TRAIL_MAX_DISTANCE.to_string()),
                ("key", self.endpoint.api_key.clone()),
            ]);

        let body: RawTrailResponse = get_json(PROVIDER, request).await?;
        Ok(body.into_items())
    }
}
