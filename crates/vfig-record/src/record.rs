use rand::Rng;
use serde::Serialize;
use vfig_types::{names, CalendarDate, CatalogEntry, HexIdentity, IDENTITY_HEX_LEN};

use crate::area::AreaTable;
use crate::error::{RecordError, RecordResult};

/// Number of bytes in a figure uuid.
pub const UUID_LENGTH: usize = 10;

/// Mii data filename referenced by freshly built records.
pub const DEFAULT_MII_CHARINFO_FILE: &str = "mii-charinfo.bin";

/// Full persisted state of one virtual figure.
///
/// A record is either built fresh from a catalog entry or reconstructed by a
/// bundle reader, then edited in memory and written back as a whole. The
/// identity is fixed at construction. The area table is pass-through state:
/// nothing here edits it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FigureRecord {
    identity: HexIdentity,
    /// Display name. At most [`names::NAME_MAX_LENGTH`] characters when set
    /// through [`rename`](Self::rename); records read from disk may exceed it.
    pub name: String,
    pub uuid: [u8; UUID_LENGTH],
    /// When set, consumers generate a uuid at runtime and ignore `uuid`.
    pub use_random_uuid: bool,
    pub first_write_date: CalendarDate,
    pub last_write_date: CalendarDate,
    pub write_counter: u16,
    pub version: u32,
    /// Mii data file, relative to the bundle directory.
    pub mii_data_filename: String,
    areas: Option<AreaTable>,
}

impl FigureRecord {
    /// Create a record with zeroed counters, both dates set to `date`, the
    /// default mii filename and no areas.
    pub fn new(
        identity: HexIdentity,
        name: impl Into<String>,
        uuid: [u8; UUID_LENGTH],
        date: CalendarDate,
    ) -> Self {
        Self {
            identity,
            name: name.into(),
            uuid,
            use_random_uuid: false,
            first_write_date: date,
            last_write_date: date,
            write_counter: 0,
            version: 0,
            mii_data_filename: DEFAULT_MII_CHARINFO_FILE.to_string(),
            areas: None,
        }
    }

    /// Build a fresh record for a catalog entry, dated today.
    pub fn build<R: Rng + ?Sized>(
        entry: &CatalogEntry,
        name: &str,
        rng: &mut R,
    ) -> RecordResult<Self> {
        Self::build_at(entry, name, rng, CalendarDate::today())
    }

    /// Build a fresh record for a catalog entry with an explicit date.
    ///
    /// The uuid is drawn from `rng`; it is cosmetic, so any generator will
    /// do, and a seeded one makes the result reproducible.
    pub fn build_at<R: Rng + ?Sized>(
        entry: &CatalogEntry,
        name: &str,
        rng: &mut R,
        date: CalendarDate,
    ) -> RecordResult<Self> {
        let actual = entry.identity_string().chars().count();
        if actual != IDENTITY_HEX_LEN {
            return Err(RecordError::InvalidIdentity { actual });
        }
        let identity = entry.identity()?;

        let mut uuid = [0u8; UUID_LENGTH];
        rng.fill(&mut uuid[..]);

        tracing::debug!(identity = %identity, name, "built figure record");
        Ok(Self::new(identity, name, uuid, date))
    }

    pub fn identity(&self) -> HexIdentity {
        self.identity
    }

    /// Replace the name, silently cutting it to the length cap.
    pub fn rename(&mut self, new_name: &str) {
        self.name = names::truncate(new_name, names::NAME_MAX_LENGTH);
    }

    /// Whether the stored name exceeds the length cap.
    pub fn name_too_long(&self) -> bool {
        self.name.chars().count() > names::NAME_MAX_LENGTH
    }

    pub fn has_areas(&self) -> bool {
        self.areas.is_some()
    }

    pub fn areas(&self) -> Option<&AreaTable> {
        self.areas.as_ref()
    }

    /// Attach the area table found next to a bundle.
    pub fn with_areas(mut self, areas: Option<AreaTable>) -> Self {
        self.areas = areas;
        self
    }
}
