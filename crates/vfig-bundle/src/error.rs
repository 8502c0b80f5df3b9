use std::path::PathBuf;

use thiserror::Error;
use vfig_record::RecordError;

/// Errors from bundle operations.
///
/// Structural findings while reading a bundle are not errors; they are
/// reported through [`StatusSet`](vfig_record::StatusSet).
#[derive(Debug, Error)]
pub enum BundleError {
    /// I/O error outside of a write sequence.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// A write stopped part way. The directory may be left inconsistent and
    /// should be regenerated.
    #[error("failed to write bundle at {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid figure name: {0}")]
    InvalidName(String),

    #[error("invalid directory name: {0}")]
    InvalidDirectory(String),

    /// No bundle of any known layout at the path.
    #[error("not a bundle: {0}")]
    NotABundle(PathBuf),

    /// Source and destination of an upgrade are the same directory.
    #[error("upgrade source and destination are the same: {0}")]
    SamePath(PathBuf),

    /// One upgrade directory lies inside the other.
    #[error("upgrade source {src} and destination {dst} overlap")]
    NestedPath { src: PathBuf, dst: PathBuf },

    /// A legacy file is missing or has an unusable value.
    #[error("legacy {file}: {reason}")]
    LegacyField { file: &'static str, reason: String },

    #[error("record error: {0}")]
    Record(#[from] RecordError),
}

impl From<serde_json::Error> for BundleError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result alias for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;
