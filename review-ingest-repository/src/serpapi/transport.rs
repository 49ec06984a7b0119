//! HTTP transport behind the SerpApi client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::errors::SearchApiError;

/// Fixed per-request socket timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://serpapi.com/search";

/// One GET against the search endpoint.
///
/// The client's retry and pagination logic sits on top of this seam, so
/// tests can substitute a scripted page sequence for the network.
#[async_trait]
pub trait SerpTransport: Send + Sync {
    /// Issue one request with the given query parameters and return the
    /// decoded JSON body.
    async fn get_json(&self, params: &[(String, String)]) -> Result<Value, SearchApiError>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport against the default endpoint.
    pub fn new() -> Result<Self, SearchApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a transport against a custom endpoint.
    pub fn with_base_url(base_url: &str) -> Result<Self, SearchApiError> {
        let base_url = Url::parse(base_url).map_err(|e| SearchApiError::build(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SearchApiError::build(e.to_string()))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl SerpTransport for HttpTransport {
    async fn get_json(&self, params: &[(String, String)]) -> Result<Value, SearchApiError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<Value>().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_is_a_build_error() {
        let err = HttpTransport::with_base_url("not a url").unwrap_err();
        assert!(matches!(err, SearchApiError::BuildError(_)));
    }
}
