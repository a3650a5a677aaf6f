use std::path::Path;

use crate::error::StoreResult;
use crate::handle::StoreHandle;

/// An open key-value store backing one world.
///
/// All implementations must satisfy these invariants:
/// - Keys and values are opaque byte strings; the store never interprets them.
/// - `keys()` returns every live key exactly once, in the store's iteration order.
/// - A `put` or `delete` is visible to every later call on the same handle.
/// - After `close()` every operation fails with [`StoreError::Closed`].
///
/// [`StoreError::Closed`]: crate::StoreError::Closed
pub trait WorldStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Write (create or overwrite) `key`.
    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Remove `key`. Deleting an absent key is not an error.
    fn delete(&self, key: &[u8]) -> StoreResult<()>;

    /// List all keys.
    fn keys(&self) -> StoreResult<Vec<Vec<u8>>>;

    /// The resolved world directory this store was opened on.
    fn path(&self) -> &Path;

    /// Flush pending state and release the store.
    ///
    /// Closing twice is a no-op.
    fn close(&self) -> StoreResult<()>;
}

/// Opens world stores by directory path.
///
/// This is the seam the HTTP router and the CLI use to acquire a store, so
/// both can run against [`InMemoryBackend`](crate::InMemoryBackend) in tests.
pub trait StoreOpener: Send + Sync {
    /// Open the store of the world located at `world_path`.
    fn open(&self, world_path: &Path) -> StoreResult<StoreHandle>;
}
