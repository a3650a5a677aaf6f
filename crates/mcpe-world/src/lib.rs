//! World discovery and addressing for MCPE world directories.
//!
//! A worlds root holds one directory per saved world. This crate turns those
//! directories into [`WorldRecord`]s with stable URLs, and provides the text
//! codecs used to move raw keys and values through the CLI and HTTP API.
//!
//! # Modules
//!
//! - [`codec`] -- hex keys, base64 values, hexdumps, URL path segments
//! - [`record`] -- [`WorldRecord`] and [`describe`]
//! - [`resolver`] -- [`list_worlds`] and [`fill_collection`]
//! - [`response`] -- the [`WorldsResponse`] body

pub mod codec;
pub mod error;
pub mod record;
pub mod resolver;
pub mod response;

pub use error::{CodecError, CodecResult, WorldError, WorldResult};
pub use record::{describe, WorldRecord, LEVEL_NAME_FILE};
pub use resolver::{fill_collection, list_worlds};
pub use response::{WorldsResponse, API_VERSION};
