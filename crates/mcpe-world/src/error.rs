use std::path::PathBuf;

use thiserror::Error;

/// Errors decoding external text into raw bytes or names.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid URL escape \"{0}\"")]
    InvalidEscape(String),

    #[error("invalid UTF-8 in URL segment: {0}")]
    InvalidUtf8(String),
}

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("cannot read worlds folder {}: {source}", path.display())]
    ListWorlds {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type WorldResult<T> = Result<T, WorldError>;
