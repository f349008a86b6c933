//! Application layer with record-level media resolution.

/// Service implementations.
pub mod services;

pub use services::FieldResolver;
