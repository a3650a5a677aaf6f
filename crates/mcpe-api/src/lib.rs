//! HTTP API over a directory of MCPE worlds.
//!
//! Every request under the mount prefix is decomposed into a [`route::Route`].
//! The collection is listed straight from the worlds directory. Anything
//! addressing one world opens that world's store first, then either answers
//! with the world record or hands the open store to a
//! [`SubResourceHandler`] (`db/` or `level/`). The store is released when the
//! request finishes, whatever the outcome.

pub mod config;
pub mod cors;
pub mod db;
pub mod error;
pub mod level;
pub mod route;
pub mod router;
pub mod server;
pub mod subresource;

pub use config::{ApiConfig, DEFAULT_MOUNT};
pub use db::DbHandler;
pub use error::{ApiError, ApiResult};
pub use level::LevelHandler;
pub use router::{build_router, ApiState};
pub use server::ApiServer;
pub use subresource::SubResourceHandler;
