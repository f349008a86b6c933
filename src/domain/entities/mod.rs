//! Entity definitions.

mod field_map;
mod listing;
mod resource;

pub use field_map::{FieldMap, FieldMode, RESOLVED_SUFFIX, field_map, resolved_name};
pub use listing::{ApartmentListing, BuildingComplex, RemoteFile};
pub use resource::ResourceHandle;
