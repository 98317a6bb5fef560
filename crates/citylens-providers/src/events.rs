//! Meetup upcoming events near a point.

use async_trait::async_trait;
use reqwest::Client;

use citylens_core::defaults::MEETUP_PAGE_SIZE;
use citylens_core::{
    EventRecord, LocationRef, RawMeetupEvent, RawMeetupResponse, ResourceProvider, Result,
};

use crate::client::get_json;
use crate::config::ProviderEndpoint;

const PROVIDER: &str = "meetup";

pub struct MeetupClient {
    http: Client,
    endpoint: ProviderEndpoint,
}

impl MeetupClient {
    pub fn new(http: Client, endpoint: ProviderEndpoint) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ResourceProvider<EventRecord> for MeetupClient {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<RawMeetupEvent>> {
        let (lat, lng) = location.coordinates()?;
        let request = self
            .http
            .get(self.endpoint.url("/find/upcoming_events"))
            .query(&[
                ("sign", "true".to_string()),
                ("photo-host", "public".to_string()),
                ("lon", lng.to_string()),
                ("lat", lat.to_string()),
                ("page", MEETUP_PAGE_SIZE.to_string()),
                ("key", self.endpoint.api_key.clone()),
            ]);

        let body: RawMeetupResponse = get_json(PROVIDER, request).await?;
        Ok(body.into_items())
    }
}
