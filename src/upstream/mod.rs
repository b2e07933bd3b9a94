//! Upstream country data provider.
//!
//! [`CountryProvider`] is the seam the lookup service depends on;
//! [`RestCountriesClient`] is the production implementation talking to the
//! REST Countries v3.1 API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, trace};

use crate::model::CountrySummary;

pub mod record;

pub use record::ProviderRecord;

/// Default provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors produced while fetching and normalizing provider data.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("upstream request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to fetch country data (status {status})")]
    Status { status: u16 },

    #[error("failed to decode country data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("country data is missing {field}")]
    IncompleteRecord { field: &'static str },

    #[error("country not found")]
    NotFound,
}

/// Source of truth for country summaries.
#[async_trait]
pub trait CountryProvider: Send + Sync {
    /// Fetches and normalizes the country matching `name`.
    async fn fetch(&self, name: &str) -> Result<CountrySummary, UpstreamError>;
}

/// [`CountryProvider`] backed by the REST Countries HTTP API.
///
/// One `reqwest::Client` is shared by every lookup, so connections are pooled.
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    base_url: Url,
    timeout: Duration,
    client: reqwest::Client,
}

impl RestCountriesClient {
    /// Creates a client for `base_url` applying `timeout` to every request.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::InvalidBaseUrl`]: `base_url` is not an absolute URL
    ///   that can carry path segments.
    /// - [`UpstreamError::Transport`]: the HTTP client could not be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let invalid = || UpstreamError::InvalidBaseUrl {
            url: base_url.to_owned(),
        };
        let parsed = Url::parse(base_url).map_err(|_| invalid())?;
        if parsed.cannot_be_a_base() {
            return Err(invalid());
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self {
            base_url: parsed,
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `{base}/name/{name}`, with `name` percent-encoded as a single segment.
    fn lookup_url(&self, name: &str) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .push("name")
            .push(name);
        Ok(url)
    }

    fn transport_error(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout {
                timeout: self.timeout,
            }
        } else {
            UpstreamError::Transport(error)
        }
    }
}

#[async_trait]
impl CountryProvider for RestCountriesClient {
    async fn fetch(&self, name: &str) -> Result<CountrySummary, UpstreamError> {
        let url = self.lookup_url(name)?;
        debug!(%url, "requesting country data");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        trace!(status = status.as_u16(), body = %String::from_utf8_lossy(&body), "upstream response");

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let records: Vec<ProviderRecord> = serde_json::from_slice(&body)?;
        let first = records.into_iter().next().ok_or(UpstreamError::NotFound)?;

        CountrySummary::try_from(first)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> RestCountriesClient {
        RestCountriesClient::new(&server.uri(), Duration::from_secs(2)).unwrap()
    }

    fn india() -> serde_json::Value {
        serde_json::json!([{
            "name": { "common": "India", "official": "Republic of India" },
            "capital": ["New Delhi"],
            "currencies": { "INR": { "name": "Indian rupee", "symbol": "₹" } },
            "population": 1380004385u64,
            "flag": "🇮🇳"
        }])
    }

    #[test]
    fn rejects_non_absolute_base_url() {
        assert!(matches!(
            RestCountriesClient::new("restcountries.com", DEFAULT_TIMEOUT),
            Err(UpstreamError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            RestCountriesClient::new("mailto:someone@example.com", DEFAULT_TIMEOUT),
            Err(UpstreamError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn lookup_url_encodes_name_as_one_segment() {
        let client = RestCountriesClient::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT).unwrap();
        let url = client.lookup_url("United States/../x").unwrap();
        assert_eq!(
            url.as_str(),
            "https://restcountries.com/v3.1/name/United%20States%2F..%2Fx"
        );
    }

    #[test]
    fn lookup_url_tolerates_trailing_slash() {
        let client =
            RestCountriesClient::new("https://restcountries.com/v3.1/", DEFAULT_TIMEOUT).unwrap();
        let url = client.lookup_url("Peru").unwrap();
        assert_eq!(url.as_str(), "https://restcountries.com/v3.1/name/Peru");
    }

    #[tokio::test]
    async fn fetch_projects_first_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/name/India"))
            .respond_with(ResponseTemplate::new(200).set_body_json(india()))
            .expect(1)
            .mount(&server)
            .await;

        let summary = client(&server).fetch("India").await.unwrap();
        assert_eq!(
            summary,
            CountrySummary {
                name: "India".to_owned(),
                capital: "New Delhi".to_owned(),
                currency: "₹".to_owned(),
                population: 1_380_004_385,
            }
        );
    }

    #[tokio::test]
    async fn empty_array_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/name/Atlantis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let err = client(&server).fetch("Atlantis").await.unwrap_err();
        assert!(matches!(err, UpstreamError::NotFound));
        assert_eq!(err.to_string(), "country not found");
    }

    #[tokio::test]
    async fn non_success_status_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/name/Atlantis"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "status": 404,
                "message": "Not Found"
            })))
            .mount(&server)
            .await;

        let err = client(&server).fetch("Atlantis").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 404 }));
        assert!(err.to_string().starts_with("failed to fetch country data"));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/name/India"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).fetch("India").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn record_without_capital_is_incomplete() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/name/Antarctica"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "name": { "common": "Antarctica" },
                "currencies": { "USD": { "symbol": "$" } },
                "population": 1000
            }])))
            .mount(&server)
            .await;

        let err = client(&server).fetch("Antarctica").await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::IncompleteRecord { field: "capital" }
        ));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(india())
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = RestCountriesClient::new(&server.uri(), Duration::from_millis(50)).unwrap();
        let err = client.fetch("India").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout { .. }));
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            RestCountriesClient::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();
        let err = client.fetch("India").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)));
    }
}
