use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use mcpe_store::StoreError;
use mcpe_world::{CodecError, WorldError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error decoding url: {0}")]
    DecodePath(String),

    #[error("Error opening world: {0}")]
    OpenWorld(StoreError),

    #[error("Endpoint not found")]
    EndpointNotFound,

    #[error("{0}")]
    NotFound(String),

    #[error("Method {0} not supported")]
    MethodNotAllowed(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid value: {0}")]
    InvalidValue(#[from] CodecError),

    #[error("Error while reading worlds folder: {0}")]
    ListWorlds(#[from] WorldError),

    #[error("{0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::DecodePath(_)
            | Self::OpenWorld(_)
            | Self::EndpointNotFound
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidBody(_) | Self::InvalidValue(_) => StatusCode::BAD_REQUEST,
            Self::ListWorlds(_)
            | Self::Serialization(_)
            | Self::Store(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{self}\n"),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
