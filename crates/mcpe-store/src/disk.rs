use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::handle::StoreHandle;
use crate::traits::{StoreOpener, WorldStore};

/// Directory inside a world that holds the key-value data.
pub const DB_DIR: &str = "db";

/// Log file inside [`DB_DIR`].
pub const LOG_FILE: &str = "kv.log";

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// One mutation in the store log.
///
/// On-disk framing:
/// ```text
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized LogRecord)]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum LogRecord {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Flush/sync strategy for the store log.
#[derive(Clone, Debug, Default)]
pub enum SyncMode {
    /// `fsync` after every write.
    EveryWrite,
    /// Hand every frame to the OS as it is written, `fsync` on close.
    #[default]
    OnClose,
}

/// Opens [`DiskWorldStore`]s.
#[derive(Clone, Debug, Default)]
pub struct DiskBackend {
    sync_mode: SyncMode,
}

impl DiskBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sync_mode(sync_mode: SyncMode) -> Self {
        Self { sync_mode }
    }
}

impl StoreOpener for DiskBackend {
    fn open(&self, world_path: &Path) -> StoreResult<StoreHandle> {
        let store = DiskWorldStore::open(world_path, self.sync_mode.clone())?;
        Ok(StoreHandle::new(store))
    }
}

/// Log-structured world store.
///
/// Mutations are appended to `<world>/db/kv.log`; the full key space is kept
/// in an ordered in-memory index rebuilt from the log on open. Opening never
/// writes: the `db/` directory and the log are created by the first mutation.
/// Each frame is appended with a single write, and replay resynchronizes on
/// the next intact frame after any unreadable bytes, so a torn or foreign
/// frame never hides the frames written after it.
pub struct DiskWorldStore {
    path: PathBuf,
    log_path: PathBuf,
    index: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    writer: Mutex<Option<File>>,
    closed: AtomicBool,
    sync_mode: SyncMode,
}

impl DiskWorldStore {
    /// Open the store of the world directory at `world_path`.
    ///
    /// The world directory must already exist. A world without a log is an
    /// empty store.
    pub fn open(world_path: &Path, sync_mode: SyncMode) -> StoreResult<Self> {
        let meta = fs::metadata(world_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::WorldNotFound(world_path.to_path_buf()),
            _ => StoreError::Io(e),
        })?;
        if !meta.is_dir() {
            return Err(StoreError::NotAWorld(world_path.to_path_buf()));
        }

        let path = fs::canonicalize(world_path)?;
        let log_path = path.join(DB_DIR).join(LOG_FILE);

        let data = match fs::read(&log_path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let index = replay(&data);

        debug!(path = %path.display(), keys = index.len(), "opened world store");
        Ok(Self {
            path,
            log_path,
            index: RwLock::new(index),
            writer: Mutex::new(None),
            closed: AtomicBool::new(false),
            sync_mode,
        })
    }

    /// Path to the log file. It may not exist yet.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    fn append(&self, record: &LogRecord) -> StoreResult<()> {
        let payload =
            bincode::serialize(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        frame.extend_from_slice(&payload);

        let mut guard = self.writer.lock().expect("store writer mutex poisoned");
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        if guard.is_none() {
            *guard = Some(self.open_log()?);
        }
        let file = guard.as_mut().ok_or(StoreError::Closed)?;

        file.write_all(&frame)?;
        if matches!(self.sync_mode, SyncMode::EveryWrite) {
            file.sync_all()?;
        }
        Ok(())
    }

    fn open_log(&self) -> StoreResult<File> {
        if let Some(db_dir) = self.log_path.parent() {
            fs::create_dir_all(db_dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.log_path)?;
        debug!(path = %self.log_path.display(), "opened store log for writing");
        Ok(file)
    }
}

impl WorldStore for DiskWorldStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.ensure_open()?;
        let index = self.index.read().expect("store index lock poisoned");
        Ok(index.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.ensure_open()?;
        self.append(&LogRecord::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        let mut index = self.index.write().expect("store index lock poisoned");
        index.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.ensure_open()?;
        if !self.index.read().expect("store index lock poisoned").contains_key(key) {
            return Ok(());
        }
        self.append(&LogRecord::Delete { key: key.to_vec() })?;
        let mut index = self.index.write().expect("store index lock poisoned");
        index.remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<Vec<u8>>> {
        self.ensure_open()?;
        let index = self.index.read().expect("store index lock poisoned");
        Ok(index.keys().cloned().collect())
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn close(&self) -> StoreResult<()> {
        let writer = {
            let mut guard = self.writer.lock().expect("store writer mutex poisoned");
            if self.closed.swap(true, Ordering::AcqRel) {
                return Ok(());
            }
            guard.take()
        };
        if let Some(file) = writer {
            file.sync_all()?;
        }
        debug!(path = %self.path.display(), "closed world store");
        Ok(())
    }
}

impl std::fmt::Debug for DiskWorldStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskWorldStore")
            .field("path", &self.path)
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish()
    }
}

/// Rebuild the index from raw log bytes.
///
/// A frame is accepted when its length fits the remaining data and its CRC
/// matches. Anything else is skipped one byte at a time until the next
/// intact frame, so unreadable regions only lose the records inside them.
fn replay(data: &[u8]) -> BTreeMap<Vec<u8>, Vec<u8>> {
    let mut index = BTreeMap::new();
    let mut offset = 0usize;
    let mut skipped_from = None;

    while offset < data.len() {
        let Some(payload) = frame_at(data, offset) else {
            skipped_from.get_or_insert(offset);
            offset += 1;
            continue;
        };
        if let Some(from) = skipped_from.take() {
            warn!(from, to = offset, "skipped unreadable bytes in store log");
        }

        match bincode::deserialize::<LogRecord>(payload) {
            Ok(LogRecord::Put { key, value }) => {
                index.insert(key, value);
            }
            Ok(LogRecord::Delete { key }) => {
                index.remove(&key);
            }
            Err(e) => {
                warn!(offset, error = %e, "failed to decode log frame; skipping");
            }
        }
        offset += HEADER_SIZE + payload.len();
    }

    if let Some(from) = skipped_from {
        warn!(from, to = data.len(), "ignoring unreadable tail of store log");
    }
    index
}

/// The payload of the intact frame starting at `offset`, if there is one.
fn frame_at(data: &[u8], offset: usize) -> Option<&[u8]> {
    let header = data.get(offset..offset + HEADER_SIZE)?;
    let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
    let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if length == 0 {
        return None;
    }
    let start = offset + HEADER_SIZE;
    let payload = data.get(start..start.checked_add(length)?)?;
    (crc32fast::hash(payload) == expected_crc).then_some(payload)
}
