//! Figure record model for virtual figure bundles.
//!
//! - [`FigureRecord`]: the aggregate written to and read from a bundle
//! - [`AreaTable`] / [`AreaEntry`]: optional per-slot application data
//! - [`StatusSet`] / [`StatusKind`]: diagnostics accumulated by bundle readers
//!
//! Nothing in this crate touches the filesystem.

pub mod area;
pub mod error;
pub mod record;
pub mod status;

pub use area::{AreaEntry, AreaTable};
pub use error::{RecordError, RecordResult};
pub use record::{FigureRecord, DEFAULT_MII_CHARINFO_FILE, UUID_LENGTH};
pub use status::{StatusKind, StatusSet};
