// crates/network/src/remote.rs
//! Quote server reached over HTTP

use crate::client::{parse_endpoint, Client, ClientConfig};
use crate::error::{NetworkError, NetworkResult};
use async_trait::async_trait;
use quotesync_core::Quote;
use quotesync_sync_engine::{RemoteService, SyncError, SyncResult};
use reqwest::Url;

/// [`RemoteService`] backed by a REST endpoint
///
/// `GET {endpoint}` returns a JSON array of quotes; `POST {endpoint}` accepts
/// a single JSON quote.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    endpoint: Url,
}

impl HttpRemote {
    /// Creates a remote for `endpoint`
    pub fn new(endpoint: &str, config: ClientConfig) -> NetworkResult<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        let client = Client::with_config(config)?;
        log::info!("Using quote server at {}", endpoint);
        Ok(Self { client, endpoint })
    }

    /// Returns the endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch(&self) -> NetworkResult<Vec<Quote>> {
        let body: serde_json::Value = self.client.get_json(&self.endpoint).await?;
        if !body.is_array() {
            return Err(NetworkError::UnexpectedResponse(
                "expected a JSON array of quotes".to_string(),
            ));
        }
        serde_json::from_value(body).map_err(|e| NetworkError::UnexpectedResponse(e.to_string()))
    }

    fn transport_error(&self, err: NetworkError) -> SyncError {
        if err.is_timeout() {
            log::warn!(
                "Quote server at {} did not answer within {:?}",
                self.endpoint,
                self.client.config().timeout
            );
        } else if err.is_server_error() {
            log::warn!("Quote server at {} is failing: {}", self.endpoint, err);
        } else if err.is_client_error() {
            log::warn!("Quote server at {} rejected the request: {}", self.endpoint, err);
        } else {
            log::debug!("Request to {} failed: {}", self.endpoint, err);
        }
        err.into()
    }
}

#[async_trait]
impl RemoteService for HttpRemote {
    async fn list(&self) -> SyncResult<Vec<Quote>> {
        let quotes = self.fetch().await.map_err(|e| self.transport_error(e))?;
        log::debug!("Fetched {} quotes from server", quotes.len());
        Ok(quotes)
    }

    async fn submit(&self, quote: &Quote) -> SyncResult<()> {
        self.client
            .post_json(&self.endpoint, quote)
            .await
            .map_err(|e| self.transport_error(e))
    }
}
