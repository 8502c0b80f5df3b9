use thiserror::Error;
use vfig_types::CodecError;

/// Errors from building a [`FigureRecord`](crate::FigureRecord).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The catalog identifier does not have 16 characters.
    #[error("invalid catalog identity: expected 16 characters, got {actual}")]
    InvalidIdentity { actual: usize },

    /// The catalog identifier has the right length but does not decode.
    #[error("identity codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type RecordResult<T> = Result<T, RecordError>;
