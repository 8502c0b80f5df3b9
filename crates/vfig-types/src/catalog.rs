//! Figure catalog entries as published by the public figure catalog.
//!
//! Fetching the document is someone else's job; this module only turns an
//! already-downloaded JSON document into typed entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CodecResult};
use crate::identity::HexIdentity;

/// One figure in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(rename = "amiiboSeries")]
    pub series_name: String,
    #[serde(rename = "character")]
    pub character_name: String,
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(rename = "head")]
    pub identity_head: String,
    #[serde(rename = "tail")]
    pub identity_tail: String,
}

impl CatalogEntry {
    /// The full identifier, head followed by tail.
    pub fn identity_string(&self) -> String {
        format!("{}{}", self.identity_head, self.identity_tail)
    }

    /// Decode the identifier into its structured form.
    pub fn identity(&self) -> CodecResult<HexIdentity> {
        HexIdentity::decode(&self.identity_head, &self.identity_tail)
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    amiibo: Vec<CatalogEntry>,
}

/// A parsed catalog document, entries in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a catalog document of the form `{"amiibo": [ ... ]}`.
    ///
    /// Keys the entries do not use are ignored.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        tracing::debug!(entries = document.amiibo.len(), "parsed catalog");
        Ok(Self {
            entries: document.amiibo,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries grouped by series name, each group sorted by entry name.
    pub fn by_series(&self) -> BTreeMap<String, Vec<CatalogEntry>> {
        let mut groups: BTreeMap<String, Vec<CatalogEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups
                .entry(entry.series_name.clone())
                .or_default()
                .push(entry.clone());
        }
        for group in groups.values_mut() {
            group.sort_by(|a, b| a.name.cmp(&b.name));
        }
        groups
    }

    /// Series names in sorted order.
    pub fn series_names(&self) -> Vec<String> {
        self.by_series().into_keys().collect()
    }

    /// Look up an entry by series and figure name.
    pub fn find(&self, series: &str, name: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.series_name == series && e.name == name)
    }
}
