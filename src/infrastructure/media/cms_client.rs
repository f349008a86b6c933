//! CMS file API client for binary media downloads.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::domain::errors::FetchError;
use crate::domain::ports::{BinaryFetchPort, FetchResult};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the CMS file service, implementing the binary fetch port
/// consumed by the resource cache.
pub struct CmsMediaClient {
    client: Client,
    base_url: String,
}

impl CmsMediaClient {
    /// Creates a client for the given API base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn download_url(&self, path: &str) -> String {
        format!(
            "{}/files/download?path={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(path)
        )
    }
}

#[async_trait]
impl BinaryFetchPort for CmsMediaClient {
    async fn fetch_binary(&self, path: &str) -> FetchResult<Bytes> {
        let url = self.download_url(path);
        debug!(path = %path, "downloading media from CMS");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(path = %path, error = %e, "media download failed");
            if e.is_timeout() {
                FetchError::network("request timed out")
            } else if e.is_connect() {
                FetchError::network("failed to connect to CMS")
            } else {
                FetchError::network(e.to_string())
            }
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(FetchError::not_found(path)),
            status if !status.is_success() => {
                Err(FetchError::unexpected(format!("unexpected response: {status}")))
            }
            _ => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| FetchError::network(format!("failed to read body: {e}")))?;
                if bytes.is_empty() {
                    return Err(FetchError::empty_payload(path));
                }
                Ok(bytes)
            }
        }
    }
}
