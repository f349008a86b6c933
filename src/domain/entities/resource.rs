//! Domain types for locally cached media resources.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use uuid::Uuid;

/// A local, process-lifetime handle to a fetched media resource.
///
/// Handles are created and owned exclusively by the resource cache; callers
/// only hold transient clones for rendering. Cloning is cheap (the payload is
/// shared) and all clones refer to the same underlying resource. The cache
/// revokes a handle when the entry backing it is evicted, pruned, or cleared.
#[derive(Debug, Clone)]
pub struct ResourceHandle {
    inner: Arc<HandleInner>,
}

#[derive(Debug)]
struct HandleInner {
    uri: String,
    data: Bytes,
    revoked: AtomicBool,
}

impl ResourceHandle {
    /// Wraps a fetched payload in a fresh handle with a unique display URI.
    pub(crate) fn new(data: Bytes) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                uri: format!("mem://{}", Uuid::new_v4()),
                data,
                revoked: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the display URI for this handle, usable directly as an image
    /// source by rendering code.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.inner.uri
    }

    /// Returns the raw payload bytes backing this handle.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.inner.data
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.data.len()
    }

    /// Returns true if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.data.is_empty()
    }

    /// Returns true if the cache has released this handle.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.inner.revoked.load(Ordering::SeqCst)
    }

    /// Marks the handle as released. Returns true only for the call that
    /// actually performed the revocation, so a handle is released at most
    /// once no matter how many clones exist.
    pub(crate) fn revoke(&self) -> bool {
        !self.inner.revoked.swap(true, Ordering::SeqCst)
    }
}

impl PartialEq for ResourceHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ResourceHandle {}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.uri)
    }
}
