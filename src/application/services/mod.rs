//! Application services.

pub mod field_resolver;

pub use field_resolver::FieldResolver;
