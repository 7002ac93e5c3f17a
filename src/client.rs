//! HTTP client shared by the catalog fetcher and the detail extractors
//!
//! This module handles:
//! - Building a reqwest client that sends the fixed header set on every request
//! - Resolving Codeforces endpoints against the configured site root
//! - GETs that return page text or a decoded API envelope
//! - Classifying failures so each caller can wrap them in its own error type

use crate::config::ClientConfig;
use crate::{ExtractionError, HarvestError, ListingError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Why a GET did not produce the expected payload
#[derive(Debug)]
pub enum FetchFailure {
    /// Connection, TLS, timeout or body read failure
    Http(reqwest::Error),

    /// The server answered with a non-2xx status
    Status(u16),

    /// The body was not the JSON shape we expected
    Decode(serde_json::Error),

    /// The API envelope carried a non-OK status
    Api(String),
}

impl ListingError {
    pub(crate) fn from_failure(url: &Url, failure: FetchFailure) -> Self {
        let url = url.to_string();
        match failure {
            FetchFailure::Http(source) => Self::Http { url, source },
            FetchFailure::Status(status) => Self::Status { url, status },
            FetchFailure::Decode(source) => Self::Decode { url, source },
            FetchFailure::Api(comment) => Self::Api { comment },
        }
    }
}

impl ExtractionError {
    pub(crate) fn from_failure(url: &Url, failure: FetchFailure) -> Self {
        let url = url.to_string();
        match failure {
            FetchFailure::Http(source) => Self::Http { url, source },
            FetchFailure::Status(status) => Self::Status { url, status },
            FetchFailure::Decode(source) => Self::Decode { url, source },
            FetchFailure::Api(comment) => Self::Api { comment },
        }
    }
}

/// Envelope wrapping every Codeforces API answer
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub result: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, or the API's own explanation when it refused
    pub fn into_result(self) -> Result<T, FetchFailure> {
        match (self.status.as_str(), self.result) {
            ("OK", Some(result)) => Ok(result),
            ("OK", None) => Err(FetchFailure::Api("OK response without a result".to_string())),
            (status, _) => Err(FetchFailure::Api(
                self.comment.unwrap_or_else(|| format!("status {}", status)),
            )),
        }
    }
}

/// Client for one Codeforces site
#[derive(Debug, Clone)]
pub struct HarvestClient {
    http: Client,
    base: Url,
}

impl HarvestClient {
    /// Builds the client from configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cf_harvest::client::HarvestClient;
    /// use cf_harvest::config::ClientConfig;
    ///
    /// let client = HarvestClient::new(&ClientConfig::default()).unwrap();
    /// assert_eq!(client.base_url().as_str(), "https://codeforces.com/");
    /// ```
    pub fn new(config: &ClientConfig) -> Result<Self, HarvestError> {
        let mut base = Url::parse(&config.base_url)?;
        if base.cannot_be_a_base() {
            return Err(HarvestError::Config(crate::ConfigError::InvalidUrl(format!(
                "base-url '{}' cannot be used as a site root",
                config.base_url
            ))));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http: build_http_client(config)?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/api/problemset.problems`
    pub fn problemset_url(&self) -> Url {
        self.endpoint(&["api", "problemset.problems"])
    }

    /// `{base}/api/contest.list`
    pub fn contest_list_url(&self) -> Url {
        self.endpoint(&["api", "contest.list"])
    }

    /// `{base}/api/contest.status?contestId={id}`
    pub fn contest_status_url(&self, contest_id: i64) -> Url {
        let mut url = self.endpoint(&["api", "contest.status"]);
        url.query_pairs_mut()
            .append_pair("contestId", &contest_id.to_string());
        url
    }

    /// `{base}/problemset/problem/{contest_id}/{index}`
    pub fn problem_url(&self, contest_id: i64, index: &str) -> Url {
        self.endpoint(&["problemset", "problem", &contest_id.to_string(), index])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // The base was checked to be a proper base URL in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GETs a page and returns its body as text
    pub async fn get_text(&self, url: &Url) -> Result<String, FetchFailure> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(FetchFailure::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        response.text().await.map_err(FetchFailure::Http)
    }

    /// GETs an API endpoint and unwraps its `result`
    pub async fn get_api<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchFailure> {
        let body = self.get_text(url).await?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&body).map_err(FetchFailure::Decode)?;
        envelope.into_result()
    }
}

/// Builds the reqwest client carrying the fixed header set
///
/// Accept-Encoding is sent as configured; reqwest still decodes gzip and
/// brotli bodies transparently.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, HarvestError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_str(&config.accept)?);
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&config.accept_language)?);
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_str(&config.accept_encoding)?);
    headers.insert(REFERER, HeaderValue::from_str(&config.referer)?);

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}
