//! Infrastructure layer with external service adapters.

/// Media caching and CMS download adapters.
pub mod media;

pub use media::{CacheStats, CmsMediaClient, ResourceCache, ResourceCacheConfig};
