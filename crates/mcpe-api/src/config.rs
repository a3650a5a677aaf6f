use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Mount prefix used when none is configured.
pub const DEFAULT_MOUNT: &str = "/api/v1/worlds/";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Path prefix the worlds API is served under.
    pub mount: String,
    /// Directory holding one subdirectory per world. Unset means the
    /// current directory, or whatever the caller picks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worlds_root: Option<PathBuf>,
    /// Open every listed world when serving the collection and report open
    /// failures in the record's `error` field.
    pub probe_worlds: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            mount: DEFAULT_MOUNT.into(),
            worlds_root: None,
            probe_worlds: false,
        }
    }
}

impl ApiConfig {
    pub fn from_toml_str(text: &str) -> ApiResult<Self> {
        toml::from_str(text).map_err(|e| ApiError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ApiResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// The configured worlds root, or the current directory.
    pub fn worlds_root(&self) -> PathBuf {
        self.worlds_root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// The mount prefix, beginning and ending with `/`.
    pub fn mount_prefix(&self) -> String {
        normalize_mount(&self.mount)
    }
}

/// Normalize a mount prefix to begin and end with exactly one `/`.
pub fn normalize_mount(mount: &str) -> String {
    let trimmed = mount.trim_matches('/');
    if trimmed.is_empty() {
        "/".into()
    } else {
        format!("/{trimmed}/")
    }
}
