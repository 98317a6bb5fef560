//! Server configuration from environment variables.

use citylens_core::{defaults, Error, Result};
use citylens_providers::ProviderConfig;

/// Everything the binary needs before it connects anywhere.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub providers: ProviderConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load server and provider settings together.
    ///
    /// Every missing required variable, server or provider, is named in a
    /// single `Error::Config`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = ServerConfig::missing_vars(&lookup);
        missing.extend(ProviderConfig::missing_vars(&lookup));
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing required variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            server: ServerConfig::from_lookup(&lookup)?,
            providers: ProviderConfig::from_lookup(&lookup)?,
        })
    }
}

/// Listener and store settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Read `DATABASE_URL` (required), `HOST` and `PORT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Required server variables that are unset or blank.
    pub fn missing_vars<F>(lookup: &F) -> Vec<&'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()).is_none() {
            vec!["DATABASE_URL"]
        } else {
            Vec::new()
        }
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config("missing required variable: DATABASE_URL".to_string()))?;

        let host = lookup("HOST").unwrap_or_else(|| defaults::SERVER_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("PORT must be a port number, got '{}'", raw)))?,
            None => defaults::SERVER_PORT,
        };

        Ok(Self {
            database_url,
            host,
            port,
        })
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
