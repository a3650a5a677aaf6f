//! Request path decomposition.
//!
//! A path under the mount prefix is classified once into a [`Route`] and the
//! router matches on it exhaustively:
//!
//! ```text
//! <mount>                        -> Collection
//! <mount><world>[/]              -> World { target: Item }
//! <mount><world>/db/<rest>       -> World { target: SubResource(Db, rest) }
//! <mount><world>/level/<rest>    -> World { target: SubResource(Level, rest) }
//! <mount><world>/<anything else> -> World { target: Unrecognized }
//! ```

use mcpe_world::codec::unescape_segment;

use crate::error::{ApiError, ApiResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubResourceKind {
    Db,
    Level,
}

impl SubResourceKind {
    pub fn segment(self) -> &'static str {
        match self {
            Self::Db => "db",
            Self::Level => "level",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Item,
    SubResource {
        kind: SubResourceKind,
        /// Path after `db/` or `level/`, still percent-encoded.
        remainder: String,
    },
    Unrecognized(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Collection,
    World {
        /// Decoded world directory name.
        dir_name: String,
        target: Target,
    },
}

/// Classify `path` relative to `mount` (which ends with `/`).
pub fn decompose(path: &str, mount: &str) -> ApiResult<Route> {
    let rel = path.strip_prefix(mount).ok_or(ApiError::EndpointNotFound)?;
    if rel.is_empty() {
        return Ok(Route::Collection);
    }

    let (segment, rest) = rel.split_once('/').unwrap_or((rel, ""));
    let dir_name = unescape_segment(segment).map_err(|e| ApiError::DecodePath(e.to_string()))?;
    if !is_world_name(&dir_name) {
        return Err(ApiError::DecodePath(format!("invalid world name \"{dir_name}\"")));
    }

    let target = if rest.is_empty() {
        Target::Item
    } else {
        sub_resource(rest).unwrap_or_else(|| Target::Unrecognized(rest.to_string()))
    };
    Ok(Route::World { dir_name, target })
}

fn sub_resource(rest: &str) -> Option<Target> {
    [SubResourceKind::Db, SubResourceKind::Level]
        .into_iter()
        .find_map(|kind| {
            let remainder = rest.strip_prefix(kind.segment())?.strip_prefix('/')?;
            Some(Target::SubResource {
                kind,
                remainder: remainder.to_string(),
            })
        })
}

// A world name must stay one directory below the worlds root.
fn is_world_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(|c| c == '/' || c == '\\')
}
