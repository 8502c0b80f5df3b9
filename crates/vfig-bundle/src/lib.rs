//! On-disk virtual figure bundles.
//!
//! A bundle is a directory holding one [`FigureRecord`](vfig_record::FigureRecord).
//! Two directory formats exist, each a [`BundleLayout`]:
//!
//! - [`CurrentLayout`]: `amiibo.flag`, `amiibo.json` and an optional `areas.json`
//! - [`LegacyLayout`]: `tag.json`, `model.json`, `register.json` and `common.json`
//!
//! [`BundleStore`] dispatches between them, upgrades legacy bundles and
//! generates bundles from catalog entries.

pub mod current;
pub mod error;
mod files;
pub mod generate;
pub mod layout;
pub mod legacy;
pub mod store;

pub use current::CurrentLayout;
pub use error::{BundleError, BundleResult};
pub use generate::{validate_directory_name, validate_figure_name, GenerateOptions, GenerateReport};
pub use layout::{BundleLayout, LayoutKind};
pub use legacy::{CommonInfo, LegacyBundle, LegacyLayout, ModelInfo, RegisterInfo, TagInfo};
pub use store::BundleStore;
