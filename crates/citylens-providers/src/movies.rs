//! TMDb movie search by the location's query text.

use async_trait::async_trait;
use reqwest::Client;

use citylens_core::{LocationRef, MovieRecord, RawMovie, RawMovieResponse, ResourceProvider, Result};

use crate::client::get_json;
use crate::config::ProviderEndpoint;

const PROVIDER: &str = "tmdb";

pub struct TmdbClient {
    http: Client,
    endpoint: ProviderEndpoint,
}

impl TmdbClient {
    pub fn new(http: Client, endpoint: ProviderEndpoint) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ResourceProvider<MovieRecord> for TmdbClient {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<RawMovie>> {
        let query = location.search_query()?;
        let request = self.http.get(self.endpoint.url("/3/search/movie")).query(&[
            ("api_key", self.endpoint.api_key.as_str()),
            ("language", "en-US"),
            ("query", query),
            ("page", "1"),
            ("include_adult", "false"),
        ]);

        let body: RawMovieResponse = get_json(PROVIDER, request).await?;
        Ok(body.into_items())
    }
}
