// crates/network/src/client.rs
//! HTTP client wrapper

use crate::error::{NetworkError, NetworkResult};
use reqwest::{Client as ReqwestClient, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("QuoteSync/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

/// JSON-over-HTTP client
///
/// One attempt per call. A failed request surfaces immediately; the caller
/// decides whether and when to try again.
#[derive(Debug, Clone)]
pub struct Client {
    inner: ReqwestClient,
    config: ClientConfig,
}

impl Client {
    /// Creates a new client with default configuration
    pub fn new() -> NetworkResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> NetworkResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(NetworkError::Http)?;

        Ok(Self {
            inner: client,
            config,
        })
    }

    /// Returns the configuration in use
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs a GET request and decodes a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> NetworkResult<T> {
        log::debug!("GET {}", url);
        let response = self.inner.get(url.clone()).send().await?;
        let response = Self::check_status(response)?;
        Ok(response.json::<T>().await?)
    }

    /// Performs a POST request with a JSON body
    pub async fn post_json<B>(&self, url: &Url, body: &B) -> NetworkResult<()>
    where
        B: Serialize + ?Sized,
    {
        log::debug!("POST {}", url);
        let response = self.inner.post(url.clone()).json(body).send().await?;
        Self::check_status(response)?;
        Ok(())
    }

    fn check_status(response: Response) -> NetworkResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(NetworkError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        })
    }
}

/// Parses and checks an endpoint URL
pub fn parse_endpoint(endpoint: &str) -> NetworkResult<Url> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", endpoint, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(NetworkError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            endpoint, other
        ))),
    }
}
