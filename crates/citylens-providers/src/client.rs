//! Shared HTTP plumbing for provider clients.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use citylens_core::{Error, Result};

/// Longest upstream error body echoed into an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

const USER_AGENT: &str = concat!("citylens/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by every provider.
pub fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))
}

/// Send a GET request and decode its JSON body.
///
/// Transport failures, non-2xx statuses and unparsable bodies all become
/// `Error::Provider`. URLs are stripped from transport errors because some
/// providers carry the API key in the query string.
pub async fn get_json<T: DeserializeOwned>(provider: &'static str, request: RequestBuilder) -> Result<T> {
    let start = Instant::now();

    let response = request.send().await.map_err(|e| {
        warn!(
            subsystem = "providers",
            component = provider,
            op = "send",
            error = %e.without_url(),
            "Provider request failed"
        );
        Error::Provider(format!("{} request failed", provider))
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        warn!(
            subsystem = "providers",
            component = provider,
            op = "status",
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Provider returned non-success status"
        );
        return Err(Error::Provider(format!(
            "{} returned {}: {}",
            provider, status, excerpt
        )));
    }

    let body = response.json::<T>().await.map_err(|e| {
        Error::Provider(format!(
            "{} returned an unparsable body: {}",
            provider,
            e.without_url()
        ))
    })?;

    debug!(
        subsystem = "providers",
        component = provider,
        op = "get",
        status = status.as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Provider response decoded"
    );
    Ok(body)
}
