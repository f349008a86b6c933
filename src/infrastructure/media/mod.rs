//! Media handling infrastructure.
//!
//! This module provides:
//! - In-memory resource caching with LRU capacity and idle-TTL pruning
//! - In-flight fetch deduplication per resource path
//! - The CMS-backed fetch adapter

pub mod cms_client;
pub mod resource_cache;

pub use cms_client::CmsMediaClient;
pub use resource_cache::{
    CacheStats, DEFAULT_MAX_ENTRIES, DEFAULT_TTL, ResourceCache, ResourceCacheConfig,
};
