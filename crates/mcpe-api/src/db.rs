//! Raw key-value access under `<world>/db/`.
//!
//! ```text
//! GET    db/        -> every key as hex, with its URL
//! GET    db/<hex>   -> value as base64
//! PUT    db/<hex>   -> body is the base64 value
//! DELETE db/<hex>   -> remove the key
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use mcpe_store::StoreHandle;
use mcpe_world::codec::{decode_key, decode_value, encode_key, encode_value};
use mcpe_world::API_VERSION;

use crate::error::{ApiError, ApiResult};
use crate::subresource::{json_response, with_store, SubResourceHandler};

/// Largest accepted PUT body (base64 text).
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyListing {
    pub api_version: String,
    pub keys: Vec<KeyEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub key: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValue {
    pub api_version: String,
    pub key: String,
    pub url: String,
    pub value: String,
}

pub struct DbHandler;

#[async_trait]
impl SubResourceHandler for DbHandler {
    async fn handle(
        &self,
        store: Arc<StoreHandle>,
        base_url: &str,
        remainder: &str,
        request: Request,
    ) -> ApiResult<Response> {
        let method = request.method().clone();
        if remainder.is_empty() {
            return match method {
                Method::GET => {
                    let keys = with_store(&store, |s| Ok(s.keys()?)).await?;
                    list_keys(&keys, base_url)
                }
                other => Err(ApiError::MethodNotAllowed(other.to_string())),
            };
        }
        if remainder.contains('/') {
            return Err(ApiError::EndpointNotFound);
        }

        let key = decode_key(remainder).map_err(|e| ApiError::DecodePath(e.to_string()))?;
        let key_hex = encode_key(&key);
        debug!(key = %key_hex, %method, "db request");

        match method {
            Method::GET => {
                let value = with_store(&store, move |s| Ok(s.get(&key)?))
                    .await?
                    .ok_or_else(|| ApiError::NotFound(format!("Key not found: {key_hex}")))?;
                json_response(&KeyValue {
                    api_version: API_VERSION.into(),
                    url: format!("{base_url}{key_hex}"),
                    key: key_hex,
                    value: encode_value(&value),
                })
            }
            Method::PUT => {
                let body = to_bytes(request.into_body(), MAX_BODY_SIZE)
                    .await
                    .map_err(|e| ApiError::InvalidBody(e.to_string()))?;
                let text =
                    std::str::from_utf8(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
                let value = decode_value(text)?;
                with_store(&store, move |s| Ok(s.put(&key, &value)?)).await?;
                Ok(StatusCode::NO_CONTENT.into_response())
            }
            Method::DELETE => {
                with_store(&store, move |s| Ok(s.delete(&key)?)).await?;
                Ok(StatusCode::NO_CONTENT.into_response())
            }
            other => Err(ApiError::MethodNotAllowed(other.to_string())),
        }
    }
}

fn list_keys(keys: &[Vec<u8>], base_url: &str) -> ApiResult<Response> {
    let keys = keys
        .iter()
        .map(|key| {
            let key = encode_key(key);
            KeyEntry {
                url: format!("{base_url}{key}"),
                key,
            }
        })
        .collect();
    json_response(&KeyListing {
        api_version: API_VERSION.into(),
        keys,
    })
}
