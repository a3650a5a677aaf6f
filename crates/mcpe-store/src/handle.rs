use std::fmt;
use std::ops::Deref;

use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::traits::WorldStore;

/// Exclusive ownership of one open world store.
///
/// The store is released exactly once: either explicitly through
/// [`StoreHandle::close`], which reports failures, or implicitly when the
/// handle is dropped, which logs them. Holding the handle in a local binding
/// therefore guarantees release on every return path, including `?`.
pub struct StoreHandle {
    store: Box<dyn WorldStore>,
    released: bool,
}

impl StoreHandle {
    pub fn new(store: impl WorldStore + 'static) -> Self {
        Self::from_boxed(Box::new(store))
    }

    pub fn from_boxed(store: Box<dyn WorldStore>) -> Self {
        Self { store, released: false }
    }

    /// Release the store now and surface any error from doing so.
    pub fn close(mut self) -> StoreResult<()> {
        self.released = true;
        debug!(path = %self.store.path().display(), "closing world store");
        self.store.close()
    }
}

impl Deref for StoreHandle {
    type Target = dyn WorldStore;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}

impl Drop for StoreHandle {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.store.close() {
            warn!(path = %self.store.path().display(), error = %e, "failed to release world store");
        }
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("path", &self.store.path())
            .field("released", &self.released)
            .finish()
    }
}
