use serde::{Deserialize, Serialize};

use crate::record::WorldRecord;

/// Version reported in every API response body.
pub const API_VERSION: &str = "1.0";

/// Body of a world listing request.
///
/// Serialized untagged: a collection carries `worlds`, a single world
/// carries `world`, never both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorldsResponse {
    #[serde(rename_all = "camelCase")]
    Collection {
        api_version: String,
        worlds: Vec<WorldRecord>,
    },
    #[serde(rename_all = "camelCase")]
    Item {
        api_version: String,
        world: WorldRecord,
    },
}

impl WorldsResponse {
    pub fn collection(worlds: Vec<WorldRecord>) -> Self {
        Self::Collection {
            api_version: API_VERSION.into(),
            worlds,
        }
    }

    pub fn item(world: WorldRecord) -> Self {
        Self::Item {
            api_version: API_VERSION.into(),
            world,
        }
    }
}
