//! Realty Console core - client-side media caching for a real-estate CMS
//! admin console.
//!
//! This crate provides the console's one non-trivial subsystem: a size- and
//! time-bounded cache of remotely fetched binary media (listing photos,
//! floor plans, file previews) with in-flight fetch deduplication, plus a
//! generic field resolver that augments domain records with resolved media
//! handles. Everything else the console does is routine REST wiring and
//! lives outside this crate, behind the [`domain::ports`] boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing record-level media resolution.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing caching and HTTP adapters.
pub mod infrastructure;

pub use application::FieldResolver;
pub use domain::{BinaryFetchPort, FetchError, FieldMap, FieldMode, ResourceHandle};
pub use infrastructure::{CmsMediaClient, ResourceCache, ResourceCacheConfig};

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = "realty-console";
