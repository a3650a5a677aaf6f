use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// File inside a world directory holding its display name.
pub const LEVEL_NAME_FILE: &str = "levelname.txt";

/// Addressable description of one world directory.
///
/// `db_url` and `level_url` always extend `self_url`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldRecord {
    pub name: String,
    pub dir_name: String,
    pub fqdn_dir_name: String,
    #[serde(rename = "url")]
    pub self_url: String,
    pub db_url: String,
    pub level_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorldRecord {
    /// Record that a downstream operation on this world failed.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Describe the world at `world_path`, addressed under `url_prefix`.
///
/// The display name is the verbatim content of `levelname.txt`, or the
/// directory name when that file cannot be read. Never opens the store.
pub fn describe(world_path: &Path, url_prefix: &str) -> WorldRecord {
    let dir_name = world_path
        .file_name()
        .unwrap_or(world_path.as_os_str())
        .to_string_lossy()
        .into_owned();

    let name = match fs::read_to_string(world_path.join(LEVEL_NAME_FILE)) {
        Ok(name) => name,
        Err(e) => {
            debug!(
                path = %world_path.display(),
                error = %e,
                "no readable level name; using directory name"
            );
            dir_name.clone()
        }
    };

    WorldRecord {
        name,
        dir_name,
        fqdn_dir_name: world_path.display().to_string(),
        self_url: format!("{url_prefix}/"),
        db_url: format!("{url_prefix}/db/"),
        level_url: format!("{url_prefix}/level/"),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn name_from_level_name_file() {
        let root = TempDir::new().unwrap();
        let world = root.path().join("abc123");
        fs::create_dir(&world).unwrap();
        fs::write(world.join(LEVEL_NAME_FILE), "My Survival World").unwrap();

        let record = describe(&world, "/api/v1/worlds/abc123");
        assert_eq!(record.name, "My Survival World");
        assert_eq!(record.dir_name, "abc123");
        assert_eq!(record.fqdn_dir_name, world.display().to_string());
    }

    #[test]
    fn name_is_not_trimmed() {
        let root = TempDir::new().unwrap();
        let world = root.path().join("w");
        fs::create_dir(&world).unwrap();
        fs::write(world.join(LEVEL_NAME_FILE), "Creative\n").unwrap();
        assert_eq!(describe(&world, "/w").name, "Creative\n");
    }

    #[test]
    fn missing_level_name_falls_back_to_dir_name() {
        let root = TempDir::new().unwrap();
        let world = root.path().join("fallback");
        fs::create_dir(&world).unwrap();
        let record = describe(&world, "/x");
        assert_eq!(record.name, "fallback");
        assert!(record.error.is_none());
    }

    #[test]
    fn missing_directory_still_described() {
        let record = describe(Path::new("/definitely/not/here"), "/p");
        assert_eq!(record.name, "here");
        assert_eq!(record.dir_name, "here");
    }

    #[test]
    fn urls_share_prefix() {
        let record = describe(Path::new("/worlds/w"), "/api/v1/worlds/w");
        assert_eq!(record.self_url, "/api/v1/worlds/w/");
        assert_eq!(record.db_url, "/api/v1/worlds/w/db/");
        assert_eq!(record.level_url, "/api/v1/worlds/w/level/");
        assert!(record.db_url.starts_with(&record.self_url));
        assert!(record.level_url.starts_with(&record.self_url));
    }

    #[test]
    fn wire_field_names() {
        let record = describe(Path::new("/worlds/w"), "/p");
        let json = serde_json::to_value(&record).unwrap();
        for field in ["name", "dirName", "fqdnDirName", "url", "dbUrl", "levelUrl"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert!(json.get("error").is_none());

        let json = serde_json::to_value(record.with_error("Opening world: boom")).unwrap();
        assert_eq!(json["error"], "Opening world: boom");
    }
}
