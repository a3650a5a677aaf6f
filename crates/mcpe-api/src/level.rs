use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;
use axum::http::Method;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use mcpe_store::StoreHandle;
use mcpe_world::codec::encode_value;
use mcpe_world::API_VERSION;

use crate::error::{ApiError, ApiResult};
use crate::subresource::{json_response, SubResourceHandler};

/// Level file inside a world directory.
pub const LEVEL_FILE: &str = "level.dat";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelResponse {
    pub api_version: String,
    pub url: String,
    pub file_name: String,
    pub size: u64,
    /// Raw file contents, base64.
    pub data: String,
}

/// Serves a world's `level.dat` as an opaque blob.
pub struct LevelHandler;

#[async_trait]
impl SubResourceHandler for LevelHandler {
    async fn handle(
        &self,
        store: Arc<StoreHandle>,
        base_url: &str,
        remainder: &str,
        request: Request,
    ) -> ApiResult<Response> {
        if !remainder.is_empty() {
            return Err(ApiError::EndpointNotFound);
        }
        if request.method() != Method::GET {
            return Err(ApiError::MethodNotAllowed(request.method().to_string()));
        }

        let data = tokio::fs::read(store.path().join(LEVEL_FILE))
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ApiError::NotFound(format!("{LEVEL_FILE} not found")),
                _ => ApiError::Io(e),
            })?;

        json_response(&LevelResponse {
            api_version: API_VERSION.into(),
            url: base_url.to_string(),
            file_name: LEVEL_FILE.into(),
            size: data.len() as u64,
            data: encode_value(&data),
        })
    }
}
