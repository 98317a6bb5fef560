//! Dark Sky daily forecasts.

use async_trait::async_trait;
use reqwest::Client;

use citylens_core::{
    LocationRef, RawForecastDay, RawForecastResponse, ResourceProvider, Result, WeatherRecord,
};

use crate::client::get_json;
use crate::config::ProviderEndpoint;

const PROVIDER: &str = "darksky";

pub struct DarkSkyClient {
    http: Client,
    endpoint: ProviderEndpoint,
}

impl DarkSkyClient {
    pub fn new(http: Client, endpoint: ProviderEndpoint) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ResourceProvider<WeatherRecord> for DarkSkyClient {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<RawForecastDay>> {
        let (lat, lng) = location.coordinates()?;
        // Dark Sky takes the key and coordinates as path segments.
        let url = self.endpoint.url(&format!(
            "/forecast/{}/{},{}",
            self.endpoint.api_key, lat, lng
        ));

        let body: RawForecastResponse = get_json(PROVIDER, self.http.get(url)).await?;
        Ok(body.into_items())
    }
}
