//! Thread-shareable catalog handle.

use std::sync::Arc;

use parking_lot::RwLock;

use super::Catalog;

/// Cloneable handle to a catalog snapshot that can be swapped while readers
/// are active.
///
/// The handle itself is not a [`MetadataCatalog`](super::MetadataCatalog):
/// bind against [`SharedCatalog::snapshot`], which stays the same for every
/// lookup of the statements bound against it, even if [`SharedCatalog::replace`]
/// runs concurrently.
#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<RwLock<Arc<Catalog>>>,
}

impl SharedCatalog {
    /// Wraps `catalog` in a shareable handle.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        SharedCatalog {
            inner: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.inner.read())
    }

    /// Installs a new snapshot and returns the previous one.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        std::mem::replace(&mut *self.inner.write(), Arc::new(catalog))
    }
}
