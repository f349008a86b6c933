//! Resolves declared media-path fields of a record into local handles.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::domain::entities::{FieldMap, FieldMode, resolved_name};
use crate::infrastructure::media::ResourceCache;

/// Adapter that scans an arbitrary JSON record for fields declared to hold
/// media paths, resolves every referenced path through the [`ResourceCache`]
/// in one deduplicated batch, and returns an augmented copy of the record
/// with `<field>Resolved` siblings holding the handle URIs.
///
/// The input record is never mutated. A path that fails to resolve degrades
/// to an omitted value, never to an error; one bad path cannot block its
/// siblings.
pub struct FieldResolver {
    cache: Arc<ResourceCache>,
}

impl FieldResolver {
    /// Creates a resolver backed by the given cache.
    #[must_use]
    pub fn new(cache: Arc<ResourceCache>) -> Self {
        Self { cache }
    }

    /// Returns an augmented copy of `record` with resolved sibling fields.
    ///
    /// For a `Single` field the sibling is the handle URI, added only when
    /// resolution succeeded. For an `Array` field the sibling is the list of
    /// URIs for the paths that resolved, preserving input order; it is added
    /// whenever the source array is present, and may be shorter than the
    /// source. Declared fields that are absent, empty, or of the wrong shape
    /// contribute nothing.
    pub async fn resolve_fields(
        &self,
        record: &Map<String, Value>,
        fields: &FieldMap,
    ) -> Map<String, Value> {
        let paths = Self::collect_paths(record, fields);
        trace!(paths = paths.len(), "resolving record media fields");
        let resolved = self.cache.resolve_many(&paths).await;

        let mut augmented = record.clone();
        for (name, mode) in fields {
            match (mode, record.get(name)) {
                (FieldMode::Single, Some(Value::String(path))) if !path.is_empty() => {
                    if let Some(Some(handle)) = resolved.get(path.as_str()) {
                        augmented.insert(
                            resolved_name(name),
                            Value::String(handle.uri().to_owned()),
                        );
                    }
                }
                (FieldMode::Array, Some(Value::Array(items))) => {
                    let uris: Vec<Value> = items
                        .iter()
                        .filter_map(Value::as_str)
                        .filter_map(|path| resolved.get(path).and_then(Option::as_ref))
                        .map(|handle| Value::String(handle.uri().to_owned()))
                        .collect();
                    augmented.insert(resolved_name(name), Value::Array(uris));
                }
                _ => {}
            }
        }
        augmented
    }

    /// Serializes a typed entity and resolves its declared media fields.
    ///
    /// # Errors
    /// Returns an error if the entity does not serialize to a JSON object.
    pub async fn resolve_entity<T: Serialize>(
        &self,
        entity: &T,
        fields: &FieldMap,
    ) -> serde_json::Result<Map<String, Value>> {
        let value = serde_json::to_value(entity)?;
        let Value::Object(record) = value else {
            return Err(serde::ser::Error::custom("entity is not a JSON object"));
        };
        Ok(self.resolve_fields(&record, fields).await)
    }

    /// Collects every declared path of the record into one deduplicated,
    /// order-preserving batch so sibling fields share a single fetch per
    /// underlying resource.
    fn collect_paths(record: &Map<String, Value>, fields: &FieldMap) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        let mut add = |path: &str| {
            if !path.is_empty() && !paths.iter().any(|p| p == path) {
                paths.push(path.to_owned());
            }
        };

        for (name, mode) in fields {
            match (mode, record.get(name)) {
                (FieldMode::Single, Some(Value::String(path))) => add(path),
                (FieldMode::Array, Some(Value::Array(items))) => {
                    for item in items {
                        if let Value::String(path) = item {
                            add(path);
                        }
                    }
                }
                _ => {}
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ApartmentListing, FieldMode, field_map};
    use crate::domain::ports::mocks::MockFetcher;
    use serde_json::json;

    fn resolver() -> (Arc<MockFetcher>, FieldResolver) {
        let fetcher = Arc::new(MockFetcher::new());
        let cache = Arc::new(ResourceCache::with_defaults(fetcher.clone()));
        (fetcher, FieldResolver::new(cache))
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_resolves_array_and_single_fields() {
        let (fetcher, resolver) = resolver();
        fetcher.serve("a.jpg", b"a");
        fetcher.serve("b.jpg", b"b");

        let record = as_map(json!({
            "images": ["a.jpg", "bad.jpg"],
            "layout": "b.jpg",
        }));
        let fields = field_map([("images", FieldMode::Array), ("layout", FieldMode::Single)]);

        let augmented = resolver.resolve_fields(&record, &fields).await;

        let images = augmented["imagesResolved"].as_array().unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].as_str().unwrap().starts_with("mem://"));
        assert!(augmented["layoutResolved"].as_str().unwrap().starts_with("mem://"));
        // Source fields survive untouched.
        assert_eq!(augmented["images"], record["images"]);
        assert_eq!(augmented["layout"], record["layout"]);
    }

    #[tokio::test]
    async fn test_input_record_is_not_mutated() {
        let (fetcher, resolver) = resolver();
        fetcher.serve("a.jpg", b"a");

        let record = as_map(json!({ "layout": "a.jpg" }));
        let snapshot = record.clone();
        let fields = field_map([("layout", FieldMode::Single)]);

        let _ = resolver.resolve_fields(&record, &fields).await;

        assert_eq!(record, snapshot);
    }

    #[tokio::test]
    async fn test_failed_single_field_is_omitted() {
        let (_fetcher, resolver) = resolver();

        let record = as_map(json!({ "layout": "missing.jpg" }));
        let fields = field_map([("layout", FieldMode::Single)]);

        let augmented = resolver.resolve_fields(&record, &fields).await;

        assert!(!augmented.contains_key("layoutResolved"));
    }

    #[tokio::test]
    async fn test_array_order_is_preserved() {
        let (fetcher, resolver) = resolver();
        fetcher.serve("1.jpg", b"1");
        fetcher.serve("2.jpg", b"2");
        fetcher.serve("3.jpg", b"3");

        let record = as_map(json!({ "images": ["1.jpg", "bad.jpg", "2.jpg", "3.jpg"] }));
        let fields = field_map([("images", FieldMode::Array)]);

        let augmented = resolver.resolve_fields(&record, &fields).await;
        let images = augmented["imagesResolved"].as_array().unwrap();

        assert_eq!(images.len(), 3);
        // Relative order matches the source array with the failure dropped;
        // a second lookup hits the cache and yields the same handles.
        for (slot, path) in images.iter().zip(["1.jpg", "2.jpg", "3.jpg"]) {
            let handle = resolver.cache.resolve(path).await.unwrap();
            assert_eq!(slot.as_str().unwrap(), handle.uri());
        }
    }

    #[tokio::test]
    async fn test_absent_and_empty_fields_add_nothing() {
        let (_fetcher, resolver) = resolver();

        let record = as_map(json!({ "layout": "", "title": "Studio" }));
        let fields = field_map([
            ("layout", FieldMode::Single),
            ("images", FieldMode::Array),
        ]);

        let augmented = resolver.resolve_fields(&record, &fields).await;

        assert!(!augmented.contains_key("layoutResolved"));
        assert!(!augmented.contains_key("imagesResolved"));
        assert_eq!(augmented.len(), record.len());
    }

    #[tokio::test]
    async fn test_shared_path_is_fetched_once_across_fields() {
        let (fetcher, resolver) = resolver();
        fetcher.serve("shared.jpg", b"shared");

        let record = as_map(json!({
            "images": ["shared.jpg"],
            "layout": "shared.jpg",
        }));
        let fields = field_map([("images", FieldMode::Array), ("layout", FieldMode::Single)]);

        let augmented = resolver.resolve_fields(&record, &fields).await;

        assert_eq!(fetcher.calls_for("shared.jpg"), 1);
        let image_uri = augmented["imagesResolved"][0].as_str().unwrap();
        assert_eq!(augmented["layoutResolved"].as_str().unwrap(), image_uri);
    }

    #[tokio::test]
    async fn test_empty_source_array_yields_empty_sibling() {
        let (fetcher, resolver) = resolver();

        let record = as_map(json!({ "images": [], "title": "Studio" }));
        let fields = field_map([("images", FieldMode::Array)]);

        let augmented = resolver.resolve_fields(&record, &fields).await;

        assert_eq!(augmented["imagesResolved"], json!([]));
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_array() {
        let (_fetcher, resolver) = resolver();

        let record = as_map(json!({ "images": ["bad1.jpg", "bad2.jpg"] }));
        let fields = field_map([("images", FieldMode::Array)]);

        let augmented = resolver.resolve_fields(&record, &fields).await;

        assert_eq!(augmented["imagesResolved"], json!([]));
    }

    #[tokio::test]
    async fn test_resolve_entity_roundtrip() {
        let (fetcher, resolver) = resolver();
        fetcher.serve("photos/apt/1.jpg", b"1");
        fetcher.serve("plans/apt.png", b"plan");

        let listing = ApartmentListing {
            id: "apt-1".into(),
            title: "Two-room".into(),
            images: vec!["photos/apt/1.jpg".into(), "photos/apt/missing.jpg".into()],
            layout: Some("plans/apt.png".into()),
            price: Some(120_000),
            rooms: Some(2),
        };

        let augmented = resolver
            .resolve_entity(&listing, &ApartmentListing::media_fields())
            .await
            .unwrap();

        assert_eq!(augmented["id"], "apt-1");
        assert_eq!(augmented["imagesResolved"].as_array().unwrap().len(), 1);
        assert!(augmented.contains_key("layoutResolved"));
    }

    #[tokio::test]
    async fn test_resolve_entity_rejects_non_object() {
        let (_fetcher, resolver) = resolver();

        let result = resolver
            .resolve_entity(&"just a string", &FieldMap::new())
            .await;

        assert!(result.is_err());
    }
}
