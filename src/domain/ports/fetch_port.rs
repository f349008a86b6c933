//! Binary fetch port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FetchError;

/// Result type for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Port for fetching a remote binary resource by its logical path.
///
/// The path is opaque to the cache: it is used verbatim as the cache key and
/// passed through to the implementation unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BinaryFetchPort: Send + Sync {
    /// Fetches the raw bytes for a resource path.
    async fn fetch_binary(&self, path: &str) -> FetchResult<Bytes>;
}
