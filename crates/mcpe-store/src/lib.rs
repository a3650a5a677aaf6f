//! Key-value storage for MCPE world directories.
//!
//! Every world directory is backed by a key-value database holding its
//! chunks, entities and player data under opaque binary keys. This crate
//! defines the narrow capability the rest of the workspace consumes and the
//! backends that implement it.
//!
//! # Capability
//!
//! - [`WorldStore`] -- get / put / delete / list keys on one open world
//! - [`StoreOpener`] -- opens a world by directory path
//! - [`StoreHandle`] -- exclusive ownership of one open store, released on drop
//!
//! # Backends
//!
//! - [`DiskBackend`] -- log-structured store under `<world>/db/`
//! - [`InMemoryBackend`] -- registry of in-memory worlds for tests and embedding
//!
//! # Design Rules
//!
//! 1. The store never interprets keys or values.
//! 2. A handle is owned by exactly one request or command and never outlives it.
//! 3. Release happens once, on every exit path, after a successful open.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod disk;
pub mod error;
pub mod handle;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use disk::{DiskBackend, DiskWorldStore, SyncMode};
pub use error::{StoreError, StoreResult};
pub use handle::StoreHandle;
pub use memory::{InMemoryBackend, InMemoryWorldStore};
pub use traits::{StoreOpener, WorldStore};
