//! Declarative description of which record fields hold media paths.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Suffix appended to a source field name to form its resolved sibling,
/// e.g. `images` resolves into `imagesResolved`.
pub const RESOLVED_SUFFIX: &str = "Resolved";

/// How a declared field stores its media paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
    /// The field holds a single path string.
    Single,
    /// The field holds an array of path strings.
    Array,
}

/// Mapping from field name to the mode its paths are stored in.
pub type FieldMap = HashMap<String, FieldMode>;

/// Builds a field map from name/mode pairs.
#[must_use]
pub fn field_map<const N: usize>(fields: [(&str, FieldMode); N]) -> FieldMap {
    fields
        .into_iter()
        .map(|(name, mode)| (name.to_owned(), mode))
        .collect()
}

/// Returns the resolved sibling name for a source field.
#[must_use]
pub fn resolved_name(field: &str) -> String {
    format!("{field}{RESOLVED_SUFFIX}")
}
