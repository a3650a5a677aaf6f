use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::handle::StoreHandle;
use crate::traits::{StoreOpener, WorldStore};

type Entries = Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>;

/// In-memory, `BTreeMap`-based world store.
///
/// Intended for tests and embedding. Keys iterate in byte order. Clones share
/// the same data and the same open/closed state.
#[derive(Clone)]
pub struct InMemoryWorldStore {
    path: PathBuf,
    entries: Entries,
    closed: Arc<AtomicBool>,
    open_handles: Option<Arc<AtomicUsize>>,
}

impl InMemoryWorldStore {
    /// Create a new empty store reporting `path` as its location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Arc::default(),
            closed: Arc::new(AtomicBool::new(false)),
            open_handles: None,
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

impl WorldStore for InMemoryWorldStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.ensure_open()?;
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.ensure_open()?;
        let mut map = self.entries.write().expect("lock poisoned");
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.ensure_open()?;
        let mut map = self.entries.write().expect("lock poisoned");
        map.remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<Vec<u8>>> {
        self.ensure_open()?;
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.keys().cloned().collect())
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn close(&self) -> StoreResult<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            if let Some(counter) = &self.open_handles {
                counter.fetch_sub(1, Ordering::AcqRel);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryWorldStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryWorldStore")
            .field("path", &self.path)
            .field("key_count", &self.len())
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish()
    }
}

/// Registry of in-memory worlds addressed by path.
///
/// Opening a path that was never registered fails with
/// [`StoreError::WorldNotFound`], mirroring a missing world directory. Every
/// open handle is counted until it is released, which lets tests assert that
/// no code path leaks a store.
#[derive(Default)]
pub struct InMemoryBackend {
    worlds: RwLock<HashMap<PathBuf, Entries>>,
    open_handles: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty world at `path`. Registering twice keeps the data.
    pub fn register(&self, path: impl Into<PathBuf>) {
        let mut worlds = self.worlds.write().expect("lock poisoned");
        worlds.entry(path.into()).or_default();
    }

    /// Write `key` into the world at `path`, registering it if needed.
    pub fn seed(&self, path: impl Into<PathBuf>, key: &[u8], value: &[u8]) {
        let mut worlds = self.worlds.write().expect("lock poisoned");
        let entries = worlds.entry(path.into()).or_default();
        entries
            .write()
            .expect("lock poisoned")
            .insert(key.to_vec(), value.to_vec());
    }

    /// Number of handles opened and not yet released.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::Acquire)
    }
}

impl StoreOpener for InMemoryBackend {
    fn open(&self, world_path: &Path) -> StoreResult<StoreHandle> {
        let worlds = self.worlds.read().expect("lock poisoned");
        let entries = worlds
            .get(world_path)
            .cloned()
            .ok_or_else(|| StoreError::WorldNotFound(world_path.to_path_buf()))?;
        self.open_handles.fetch_add(1, Ordering::AcqRel);
        debug!(path = %world_path.display(), "opened in-memory world store");
        Ok(StoreHandle::new(InMemoryWorldStore {
            path: world_path.to_path_buf(),
            entries,
            closed: Arc::new(AtomicBool::new(false)),
            open_handles: Some(Arc::clone(&self.open_handles)),
        }))
    }
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.worlds.read().expect("lock poisoned").len();
        f.debug_struct("InMemoryBackend")
            .field("world_count", &count)
            .field("open_handles", &self.open_handles())
            .finish()
    }
}
