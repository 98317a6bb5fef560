//! Provider configuration.
//!
//! Every provider needs a credential; every base URL can be overridden so
//! tests (and staging proxies) can stand in for the public endpoints.
//!
//! | Provider | Key variable | Base URL variable |
//! |----------|--------------|-------------------|
//! | Google geocoding | `GEOCODE_API_KEY` | `GEOCODE_BASE_URL` |
//! | Dark Sky | `DARKSKY_API_KEY` | `DARKSKY_BASE_URL` |
//! | Meetup | `MEETUP_API_KEY` | `MEETUP_BASE_URL` |
//! | TMDb | `MOVIE_API_KEY` | `MOVIE_BASE_URL` |
//! | Hiking Project | `TRAIL_API_KEY` | `TRAIL_BASE_URL` |
//! | Yelp | `YELP_API_KEY` | `YELP_BASE_URL` |
//!
//! `PROVIDER_TIMEOUT_SECS` sets the per-request timeout.

use std::fmt;

use citylens_core::{defaults, Error, Result};

/// Where a provider lives and how to authenticate with it.
#[derive(Clone)]
pub struct ProviderEndpoint {
    pub base_url: String,
    pub api_key: String,
}

impl ProviderEndpoint {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Base URL joined with an absolute path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl fmt::Debug for ProviderEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEndpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Configuration for every external provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub geocode: ProviderEndpoint,
    pub weather: ProviderEndpoint,
    pub events: ProviderEndpoint,
    pub movies: ProviderEndpoint,
    pub trails: ProviderEndpoint,
    pub listings: ProviderEndpoint,
    pub timeout_secs: u64,
}

/// (key variable, base URL variable, default base URL)
const PROVIDER_VARS: [(&str, &str, &str); 6] = [
    ("GEOCODE_API_KEY", "GEOCODE_BASE_URL", defaults::GEOCODE_BASE_URL),
    ("DARKSKY_API_KEY", "DARKSKY_BASE_URL", defaults::DARKSKY_BASE_URL),
    ("MEETUP_API_KEY", "MEETUP_BASE_URL", defaults::MEETUP_BASE_URL),
    ("MOVIE_API_KEY", "MOVIE_BASE_URL", defaults::MOVIE_BASE_URL),
    ("TRAIL_API_KEY", "TRAIL_BASE_URL", defaults::TRAIL_BASE_URL),
    ("YELP_API_KEY", "YELP_BASE_URL", defaults::YELP_BASE_URL),
];

impl ProviderConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Credential variables that are unset or blank.
    pub fn missing_vars<F>(lookup: &F) -> Vec<&'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        PROVIDER_VARS
            .iter()
            .map(|(key_var, _, _)| *key_var)
            .filter(|key_var| lookup(key_var).filter(|k| !k.trim().is_empty()).is_none())
            .collect()
    }

    /// Load through an arbitrary variable lookup.
    ///
    /// Every missing credential is reported in a single `Error::Config`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing = Self::missing_vars(&lookup);
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing provider credentials: {}",
                missing.join(", ")
            )));
        }

        let mut endpoints = Vec::with_capacity(PROVIDER_VARS.len());
        for (key_var, url_var, default_url) in PROVIDER_VARS {
            let base_url = lookup(url_var)
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| default_url.to_string());
            if let Some(key) = lookup(key_var) {
                endpoints.push(ProviderEndpoint::new(base_url, key));
            }
        }

        let timeout_secs = match lookup("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Error::Config(format!("PROVIDER_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?,
            None => defaults::PROVIDER_TIMEOUT_SECS,
        };

        let mut endpoints = endpoints.into_iter();
        let mut next = || {
            endpoints
                .next()
                .ok_or_else(|| Error::Internal("provider table out of sync".to_string()))
        };

        Ok(Self {
            geocode: next()?,
            weather: next()?,
            events: next()?,
            movies: next()?,
            trails: next()?,
            listings: next()?,
            timeout_secs,
        })
    }

    /// Point every provider at one base URL (e.g. a mock server).
    pub fn single_host(base_url: &str, api_key: &str) -> Self {
        let endpoint = ProviderEndpoint::new(base_url, api_key);
        Self {
            geocode: endpoint.clone(),
            weather: endpoint.clone(),
            events: endpoint.clone(),
            movies: endpoint.clone(),
            trails: endpoint.clone(),
            listings: endpoint,
            timeout_secs: defaults::PROVIDER_TIMEOUT_SECS,
        }
    }
}
