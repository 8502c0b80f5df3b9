use thiserror::Error;

/// Errors produced by the identity and date codecs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("identity must be 16 hex characters, got {actual}")]
    MalformedLength { actual: usize },

    #[error("invalid hex segment: {segment:?}")]
    MalformedHex { segment: String },

    #[error("invalid date (expected yyyy-MM-dd): {0:?}")]
    MalformedDate(String),
}

/// Errors produced while parsing a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
