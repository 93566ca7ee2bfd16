//! RIDB HTTP access: configuration, client construction and the resource calls
//! built on top of the page fetcher.

use std::time::Duration;

use crate::prelude::*;

pub mod aggregate;
pub mod fetch;
pub mod resources;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{aggregate, RidbPages};

/// Default RIDB API root
pub const DEFAULT_BASE_URL: &str = "https://ridb.recreation.gov/api/v1";

/// Default per-request deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// RIDB configuration from environment variables
#[derive(Debug, Clone)]
pub struct RidbConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl RidbConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let api_key = lookup("RIDB_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("missing RIDB_API_KEY".to_string()))?;

        let timeout = match lookup("RIDB_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| Error::Config(format!("invalid RIDB_TIMEOUT_SECS: {raw}")))?,
        };

        let base_url = lookup("RIDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(base_url, api_key).with_timeout(timeout))
    }

    /// Load configuration from environment variables, letting CLI values win
    ///
    /// Uses RIDB_API_KEY (required), RIDB_BASE_URL with default fallback, and
    /// RIDB_TIMEOUT_SECS with default fallback
    pub fn from_env(base_url: Option<String>, api_key: Option<String>) -> Result<Self, Error> {
        Self::from_lookup(|key| match key {
            "RIDB_BASE_URL" => base_url.clone().or_else(|| std::env::var(key).ok()),
            "RIDB_API_KEY" => api_key.clone().or_else(|| std::env::var(key).ok()),
            _ => std::env::var(key).ok(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Create an HTTP client that sends the RIDB API key on every request
pub fn create_ridb_client(config: &RidbConfig) -> Result<reqwest::Client, Error> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

    let mut headers = HeaderMap::new();
    headers.insert(
        "apikey",
        HeaderValue::from_str(&config.api_key)
            .map_err(|e| Error::Config(format!("invalid RIDB_API_KEY header value: {e}")))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))
}

/// A relative RIDB path, its extra query parameters, and a short label used in
/// error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub label: &'static str,
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    /// Every segment is percent-encoded, so caller-supplied ids cannot alter the path
    pub fn new(label: &'static str, segments: &[&str]) -> Self {
        let path = segments
            .iter()
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        Self {
            path,
            label,
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Add `key=value` only when a value is present
    pub fn with_optional_query(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }
}

/// Shared handle for talking to RIDB. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RidbClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RidbClient {
    pub fn new(config: &RidbConfig) -> Result<Self, Error> {
        Ok(Self {
            http: create_ridb_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path)
    }
}
