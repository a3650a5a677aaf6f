use std::fs;
use std::io;
use std::path::Path;

use crate::codec::escape_segment;
use crate::error::{WorldError, WorldResult};
use crate::record::{describe, WorldRecord};

/// List the world directories directly under `root`, ordered by name.
///
/// Plain files are skipped; symlinks to directories are kept.
pub fn list_worlds(root: &Path) -> WorldResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| list_error(root, e))? {
        let entry = entry.map_err(|e| list_error(root, e))?;
        if !entry.path().is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Describe every world in `names`, addressing each under
/// `url_prefix` + the escaped directory name.
pub fn fill_collection(root: &Path, url_prefix: &str, names: &[String]) -> Vec<WorldRecord> {
    names
        .iter()
        .map(|name| describe(&root.join(name), &format!("{url_prefix}{}", escape_segment(name))))
        .collect()
}

fn list_error(root: &Path, source: io::Error) -> WorldError {
    WorldError::ListWorlds {
        path: root.to_path_buf(),
        source,
    }
}
