use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use mcpe_store::StoreHandle;

use crate::error::{ApiError, ApiResult};

/// Handler for a resource nested under one world (`db/…`, `level/…`).
///
/// The router resolves and opens the world first, then hands over the open
/// store, the sub-resource's base URL, and the percent-encoded path after
/// that base. The router releases the store once the handler returns.
#[async_trait]
pub trait SubResourceHandler: Send + Sync {
    async fn handle(
        &self,
        store: Arc<StoreHandle>,
        base_url: &str,
        remainder: &str,
        request: Request,
    ) -> ApiResult<Response>;
}

/// Run `op` against the store on the blocking thread pool.
pub async fn with_store<T, F>(store: &Arc<StoreHandle>, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&StoreHandle) -> ApiResult<T> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// Two-space indented JSON body followed by a newline.
pub fn json_response<T: Serialize>(body: &T) -> ApiResult<Response> {
    let mut text = serde_json::to_string_pretty(body)?;
    text.push('\n');
    Ok(([(header::CONTENT_TYPE, "application/json")], text).into_response())
}
