//! Yelp business search by location text.

use async_trait::async_trait;
use reqwest::Client;

use citylens_core::{
    BusinessListing, LocationRef, RawBusiness, RawBusinessResponse, ResourceProvider, Result,
};

use crate::client::get_json;
use crate::config::ProviderEndpoint;

const PROVIDER: &str = "yelp";

pub struct YelpClient {
    http: Client,
    endpoint: ProviderEndpoint,
}

impl YelpClient {
    pub fn new(http: Client, endpoint: ProviderEndpoint) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ResourceProvider<BusinessListing> for YelpClient {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<RawBusiness>> {
        let query = location.search_query()?;
        let request = self
            .http
            .get(self.endpoint.url("/v3/businesses/search"))
            .query(&[("location", query)])
            .bearer_auth(&self.endpoint.api_key);

        let body: RawBusinessResponse = get_json(PROVIDER, request).await?;
        Ok(body.into_items())
    }
}
