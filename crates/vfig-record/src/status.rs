//! Structural diagnostics collected while reading a bundle.
//!
//! A read can report several independent findings at once, so they are
//! accumulated into a [`StatusSet`] instead of being returned as errors.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single finding about a bundle on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusKind {
    /// The `amiibo.flag` marker is missing. Non-fatal.
    FlagNotFound,
    /// The primary metadata could not be loaded or parsed. Fatal.
    JsonNotFound,
    /// The stored uuid is not 10 bytes long. Fatal.
    InvalidUuidLength,
    /// The referenced mii data file does not exist. Non-fatal.
    MiiCharInfoNotFound,
    /// The stored name exceeds the length cap. Non-fatal.
    InvalidNameLength,
}

impl StatusKind {
    /// Whether a read reporting this kind returns no record.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::JsonNotFound | Self::InvalidUuidLength)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlagNotFound => write!(f, "flag file not found"),
            Self::JsonNotFound => write!(f, "metadata JSON not found or invalid"),
            Self::InvalidUuidLength => write!(f, "invalid uuid length"),
            Self::MiiCharInfoNotFound => write!(f, "mii charinfo file not found"),
            Self::InvalidNameLength => write!(f, "name too long"),
        }
    }
}

/// Ordered set of [`StatusKind`]s. Empty means the bundle is clean.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSet(BTreeSet<StatusKind>);

impl StatusSet {
    /// A clean status.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A status holding exactly one kind.
    pub fn only(kind: StatusKind) -> Self {
        let mut set = Self::empty();
        set.insert(kind);
        set
    }

    /// Add a kind; returns `true` if it was not present yet.
    pub fn insert(&mut self, kind: StatusKind) -> bool {
        self.0.insert(kind)
    }

    pub fn contains(&self, kind: StatusKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn has_fatal(&self) -> bool {
        self.0.iter().any(StatusKind::is_fatal)
    }

    pub fn iter(&self) -> impl Iterator<Item = StatusKind> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<StatusKind> for StatusSet {
    fn from_iter<I: IntoIterator<Item = StatusKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for StatusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "ok");
        }
        let kinds: Vec<String> = self.iter().map(|k| k.to_string()).collect();
        write!(f, "{}", kinds.join(", "))
    }
}
