use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vfig_record::{FigureRecord, StatusKind, StatusSet};

use crate::error::BundleResult;

/// On-disk bundle generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// `amiibo.flag` + `amiibo.json` + optional `areas.json`.
    #[default]
    Current,
    /// `tag.json`, `model.json`, `register.json` and `common.json`.
    Legacy,
}

impl LayoutKind {
    /// Guess the layout of the bundle at `dir` from the files present.
    ///
    /// Either current-layout file is enough to call it current, since a
    /// current bundle missing its flag is still readable.
    pub fn detect(dir: &Path) -> Option<Self> {
        if dir.join(crate::current::AMIIBO_JSON).is_file()
            || dir.join(crate::current::FLAG_FILE).is_file()
        {
            Some(Self::Current)
        } else if dir.join(crate::legacy::MODEL_JSON).is_file() {
            Some(Self::Legacy)
        } else {
            None
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown layout '{other}' (expected current or legacy)")),
        }
    }
}

/// One bundle directory format.
///
/// Implementations must satisfy these invariants:
/// - `write` is a total overwrite: whatever was at `dir` is removed first.
/// - `write` is not atomic; on `WriteFailed` the directory is scratch.
/// - `read` never fails outright. Findings go into the returned
///   [`StatusSet`] and a fatal finding comes with no record.
pub trait BundleLayout: Send + Sync {
    fn kind(&self) -> LayoutKind;

    /// File names this layout writes. Anything else in a bundle directory
    /// belongs to someone else.
    fn owned_files(&self) -> &'static [&'static str];

    /// Persist `record` as a bundle rooted at `dir`.
    fn write(&self, dir: &Path, record: &FigureRecord) -> BundleResult<()>;

    /// Load the bundle rooted at `dir`.
    fn read(&self, dir: &Path) -> (StatusSet, Option<FigureRecord>);
}

/// Non-fatal checks every layout applies to a record it managed to load.
pub(crate) fn check_companions(dir: &Path, record: &FigureRecord, status: &mut StatusSet) {
    if !dir.join(&record.mii_data_filename).is_file() {
        tracing::debug!(
            path = %dir.display(),
            file = %record.mii_data_filename,
            "mii charinfo file not found"
        );
        status.insert(StatusKind::MiiCharInfoNotFound);
    }
    if record.name_too_long() {
        tracing::warn!(path = %dir.display(), name = %record.name, "stored name exceeds length cap");
        status.insert(StatusKind::InvalidNameLength);
    }
}
