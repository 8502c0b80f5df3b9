//! Foundation types for virtual figure bundles.
//!
//! This crate holds the pure, I/O-free pieces every other `vfig` crate
//! builds on.
//!
//! # Key Types
//!
//! - [`HexIdentity`]: structured figure identity decoded from the 16-character catalog id
//! - [`CalendarDate`]: year/month/day triple used for write dates
//! - [`CatalogEntry`] / [`Catalog`]: entries of the public figure catalog
//! - [`names`]: name sanitizing for directory segments and figure names

pub mod catalog;
pub mod date;
pub mod error;
pub mod identity;
pub mod names;

pub use catalog::{Catalog, CatalogEntry};
pub use date::CalendarDate;
pub use error::{CatalogError, CodecError, CodecResult};
pub use identity::{HexIdentity, DEFAULT_FORMAT_TAG, IDENTITY_HEX_LEN};
pub use names::NAME_MAX_LENGTH;
