//! Current bundle layout: `amiibo.flag`, `amiibo.json` and optional
//! `areas.json`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vfig_record::{AreaTable, FigureRecord, StatusKind, StatusSet, UUID_LENGTH};
use vfig_types::{CalendarDate, HexIdentity};

use crate::error::BundleResult;
use crate::files;
use crate::layout::{self, BundleLayout, LayoutKind};

pub const FLAG_FILE: &str = "amiibo.flag";
pub const AMIIBO_JSON: &str = "amiibo.json";
pub const AREAS_JSON: &str = "areas.json";

/// `amiibo.json` as stored. Keys are in the order consumers expect.
///
/// `uuid` and `use_random_uuid` were added after the first bundles of this
/// layout were written, so both may be absent on read.
#[derive(Debug, Serialize, Deserialize)]
struct AmiiboJson {
    first_write_date: CalendarDate,
    id: HexIdentity,
    last_write_date: CalendarDate,
    mii_charinfo_file: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uuid: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    use_random_uuid: Option<bool>,
    version: u32,
    write_counter: u16,
}

impl AmiiboJson {
    fn from_record(record: &FigureRecord) -> Self {
        Self {
            first_write_date: record.first_write_date,
            id: record.identity(),
            last_write_date: record.last_write_date,
            mii_charinfo_file: record.mii_data_filename.clone(),
            name: record.name.clone(),
            uuid: Some(record.uuid.to_vec()),
            use_random_uuid: Some(record.use_random_uuid),
            version: record.version,
            write_counter: record.write_counter,
        }
    }

    /// `None` when a stored uuid has the wrong length.
    fn into_record(self) -> Option<FigureRecord> {
        // A bundle without a uuid predates fixed uuids: let consumers draw one.
        let (uuid, use_random_uuid) = match self.uuid {
            Some(bytes) => (
                <[u8; UUID_LENGTH]>::try_from(bytes.as_slice()).ok()?,
                self.use_random_uuid.unwrap_or(false),
            ),
            None => ([0u8; UUID_LENGTH], true),
        };

        let mut record = FigureRecord::new(self.id, self.name, uuid, self.first_write_date);
        record.use_random_uuid = use_random_uuid;
        record.last_write_date = self.last_write_date;
        record.write_counter = self.write_counter;
        record.version = self.version;
        record.mii_data_filename = self.mii_charinfo_file;
        Some(record)
    }
}

/// Reader and writer for the current layout.
#[derive(Clone, Copy, Debug, Default)]
pub struct CurrentLayout;

impl CurrentLayout {
    pub fn new() -> Self {
        Self
    }
}

impl BundleLayout for CurrentLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Current
    }

    fn owned_files(&self) -> &'static [&'static str] {
        &[FLAG_FILE, AMIIBO_JSON, AREAS_JSON]
    }

    fn write(&self, dir: &Path, record: &FigureRecord) -> BundleResult<()> {
        files::recreate_dir(dir)?;
        files::touch(&dir.join(FLAG_FILE))?;
        files::write_json(&dir.join(AMIIBO_JSON), &AmiiboJson::from_record(record))?;
        if let Some(areas) = record.areas() {
            files::write_json(&dir.join(AREAS_JSON), areas)?;
        }

        tracing::debug!(
            path = %dir.display(),
            identity = %record.identity(),
            areas = record.has_areas(),
            "wrote current bundle"
        );
        Ok(())
    }

    fn read(&self, dir: &Path) -> (StatusSet, Option<FigureRecord>) {
        let mut status = StatusSet::empty();

        if !dir.join(FLAG_FILE).is_file() {
            tracing::warn!(path = %dir.display(), "bundle flag file missing");
            status.insert(StatusKind::FlagNotFound);
        }

        // Missing or unreadable areas only mean the figure has no slots.
        let areas = files::read_json::<AreaTable>(&dir.join(AREAS_JSON)).ok();

        let json = match files::read_json::<AmiiboJson>(&dir.join(AMIIBO_JSON)) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "cannot load bundle metadata");
                return (StatusSet::only(StatusKind::JsonNotFound), None);
            }
        };

        let Some(record) = json.into_record() else {
            tracing::warn!(path = %dir.display(), "bundle uuid has wrong length");
            return (StatusSet::only(StatusKind::InvalidUuidLength), None);
        };
        let record = record.with_areas(areas);

        layout::check_companions(dir, &record, &mut status);
        (status, Some(record))
    }
}
