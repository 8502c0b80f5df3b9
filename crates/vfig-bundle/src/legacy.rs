//! Legacy bundle layout: four sibling JSON files.
//!
//! ```text
//! tag.json       {"randomUuid": true} | {"uuid": "<20 hex>"}
//! model.json     {"amiiboId": "<16 hex>"}
//! register.json  {"name", "firstWriteDate", "miiCharInfo"}
//! common.json    {"lastWriteDate", "writeCounter", "version"}
//! ```
//!
//! Dates are `yyyy-MM-dd`. The tag uuid is its own random value and is not
//! derived from the record's byte uuid.

use std::path::Path;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use vfig_record::{FigureRecord, RecordError, StatusKind, StatusSet, UUID_LENGTH};
use vfig_types::{CalendarDate, HexIdentity};

use crate::error::{BundleError, BundleResult};
use crate::files;
use crate::layout::{self, BundleLayout, LayoutKind};

pub const TAG_JSON: &str = "tag.json";
pub const MODEL_JSON: &str = "model.json";
pub const REGISTER_JSON: &str = "register.json";
pub const COMMON_JSON: &str = "common.json";

/// Hex characters in a legacy tag uuid.
pub const TAG_UUID_HEX_LEN: usize = 20;

fn is_false(b: &bool) -> bool {
    !*b
}

/// `tag.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    #[serde(rename = "randomUuid", default, skip_serializing_if = "is_false")]
    pub random_uuid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// `model.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(rename = "amiiboId")]
    pub amiibo_id: String,
}

/// `register.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterInfo {
    pub name: String,
    #[serde(rename = "firstWriteDate")]
    pub first_write_date: String,
    #[serde(rename = "miiCharInfo")]
    pub mii_char_info: String,
}

/// `common.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonInfo {
    #[serde(rename = "lastWriteDate")]
    pub last_write_date: String,
    #[serde(rename = "writeCounter")]
    pub write_counter: u16,
    pub version: u32,
}

/// The four legacy files, parsed but not yet interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyBundle {
    pub tag: TagInfo,
    pub model: ModelInfo,
    pub register: RegisterInfo,
    pub common: CommonInfo,
}

impl LegacyBundle {
    fn from_record(record: &FigureRecord, tag: TagInfo) -> Self {
        Self {
            tag,
            model: ModelInfo {
                amiibo_id: record.identity().to_hex(),
            },
            register: RegisterInfo {
                name: record.name.clone(),
                first_write_date: record.first_write_date.format_iso(),
                mii_char_info: record.mii_data_filename.clone(),
            },
            common: CommonInfo {
                last_write_date: record.last_write_date.format_iso(),
                write_counter: record.write_counter,
                version: record.version,
            },
        }
    }

    /// Interpret the files as a [`FigureRecord`] with no areas.
    ///
    /// The record uuid is taken from the leading bytes of the tag uuid,
    /// zero-filled when there are fewer than ten. A tag without a uuid is
    /// treated as random.
    pub fn to_record(&self) -> BundleResult<FigureRecord> {
        let identity = HexIdentity::from_hex(&self.model.amiibo_id).map_err(RecordError::from)?;
        let first = CalendarDate::parse_iso(&self.register.first_write_date)
            .map_err(RecordError::from)?;
        let last =
            CalendarDate::parse_iso(&self.common.last_write_date).map_err(RecordError::from)?;

        let uuid = match &self.tag.uuid {
            Some(hex) => tag_uuid_bytes(hex)?,
            None => [0u8; UUID_LENGTH],
        };

        let mut record = FigureRecord::new(identity, self.register.name.clone(), uuid, first);
        record.use_random_uuid = self.tag.random_uuid || self.tag.uuid.is_none();
        record.last_write_date = last;
        record.write_counter = self.common.write_counter;
        record.version = self.common.version;
        record.mii_data_filename = self.register.mii_char_info.clone();
        Ok(record)
    }
}

fn tag_uuid_bytes(hex: &str) -> BundleResult<[u8; UUID_LENGTH]> {
    let invalid = |reason: String| BundleError::LegacyField {
        file: TAG_JSON,
        reason,
    };
    if !hex.is_ascii() {
        return Err(invalid(format!("uuid '{hex}' is not hex")));
    }

    let usable = hex.len().min(UUID_LENGTH * 2) & !1;
    let decoded =
        hex::decode(&hex[..usable]).map_err(|e| invalid(format!("uuid '{hex}': {e}")))?;

    let mut uuid = [0u8; UUID_LENGTH];
    uuid[..decoded.len()].copy_from_slice(&decoded);
    Ok(uuid)
}

/// Reader and writer for the legacy layout.
///
/// Writing draws a fresh tag uuid for every non-random record, so the layout
/// owns its generator. Seed it with [`from_seed`](Self::from_seed) for
/// reproducible output.
pub struct LegacyLayout {
    rng: Mutex<StdRng>,
}

impl LegacyLayout {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn random_tag_uuid(&self) -> String {
        let mut bytes = [0u8; TAG_UUID_HEX_LEN / 2];
        // A poisoned generator is still a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        rng.fill(&mut bytes[..]);
        hex::encode_upper(bytes)
    }

    /// Parse the four files at `dir` without interpreting them.
    pub fn inspect(&self, dir: &Path) -> BundleResult<LegacyBundle> {
        fn load<T: serde::de::DeserializeOwned>(dir: &Path, file: &'static str) -> BundleResult<T> {
            files::read_json(&dir.join(file)).map_err(|e| BundleError::LegacyField {
                file,
                reason: e.to_string(),
            })
        }

        Ok(LegacyBundle {
            tag: load(dir, TAG_JSON)?,
            model: load(dir, MODEL_JSON)?,
            register: load(dir, REGISTER_JSON)?,
            common: load(dir, COMMON_JSON)?,
        })
    }
}

impl Default for LegacyLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LegacyLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyLayout").finish_non_exhaustive()
    }
}

impl BundleLayout for LegacyLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Legacy
    }

    fn owned_files(&self) -> &'static [&'static str] {
        &[TAG_JSON, MODEL_JSON, REGISTER_JSON, COMMON_JSON]
    }

    fn write(&self, dir: &Path, record: &FigureRecord) -> BundleResult<()> {
        let tag = if record.use_random_uuid {
            TagInfo {
                random_uuid: true,
                uuid: None,
            }
        } else {
            TagInfo {
                random_uuid: false,
                uuid: Some(self.random_tag_uuid()),
            }
        };
        let bundle = LegacyBundle::from_record(record, tag);

        files::recreate_dir(dir)?;
        files::write_json(&dir.join(TAG_JSON), &bundle.tag)?;
        files::write_json(&dir.join(MODEL_JSON), &bundle.model)?;
        files::write_json(&dir.join(REGISTER_JSON), &bundle.register)?;
        files::write_json(&dir.join(COMMON_JSON), &bundle.common)?;

        tracing::debug!(path = %dir.display(), id = %bundle.model.amiibo_id, "wrote legacy bundle");
        Ok(())
    }

    fn read(&self, dir: &Path) -> (StatusSet, Option<FigureRecord>) {
        let record = match self.inspect(dir).and_then(|bundle| bundle.to_record()) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "cannot load legacy bundle");
                return (StatusSet::only(StatusKind::JsonNotFound), None);
            }
        };

        let mut status = StatusSet::empty();
        layout::check_companions(dir, &record, &mut status);
        (status, Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(name: &str) -> FigureRecord {
        let identity = HexIdentity::from_hex("01000000034C0902").unwrap();
        let mut record = FigureRecord::new(identity, name, [7; 10], CalendarDate::new(2019, 4, 2));
        record.last_write_date = CalendarDate::new(2020, 12, 31);
        record
    }

    fn raw(dir: &Path, file: &str) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(dir.join(file)).unwrap()).unwrap()
    }

    #[test]
    fn write_produces_four_files() {
        let tmp = tempfile::tempdir().unwrap();
        LegacyLayout::from_seed(1).write(tmp.path(), &record("Mario")).unwrap();

        let tag = raw(tmp.path(), TAG_JSON);
        let uuid = tag["uuid"].as_str().unwrap();
        assert_eq!(uuid.len(), TAG_UUID_HEX_LEN);
        assert!(uuid.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        assert!(tag.get("randomUuid").is_none());

        assert_eq!(raw(tmp.path(), MODEL_JSON), serde_json::json!({"amiiboId": "01000000034C0902"}));
        assert_eq!(
            raw(tmp.path(), REGISTER_JSON),
            serde_json::json!({
                "name": "Mario",
                "firstWriteDate": "2019-04-02",
                "miiCharInfo": "mii-charinfo.bin",
            })
        );
        assert_eq!(
            raw(tmp.path(), COMMON_JSON),
            serde_json::json!({"lastWriteDate": "2020-12-31", "writeCounter": 0, "version": 0})
        );
    }

    #[test]
    fn random_uuid_record_writes_flag_only() {
        let tmp = tempfile::tempdir().unwrap();
        let mut r = record("Mario");
        r.use_random_uuid = true;
        LegacyLayout::from_seed(1).write(tmp.path(), &r).unwrap();
        assert_eq!(raw(tmp.path(), TAG_JSON), serde_json::json!({"randomUuid": true}));
    }

    #[test]
    fn tag_uuid_is_reproducible_per_seed() {
        let a = LegacyLayout::from_seed(5);
        let b = LegacyLayout::from_seed(5);
        let first = a.random_tag_uuid();
        assert_eq!(first, b.random_tag_uuid());
        assert_ne!(first, a.random_tag_uuid());
    }

    #[test]
    fn inspect_reads_back_written_values() {
        let tmp = tempfile::tempdir().unwrap();
        LegacyLayout::from_seed(2).write(tmp.path(), &record("Mario")).unwrap();

        let bundle = LegacyLayout::from_seed(0).inspect(tmp.path()).unwrap();
        assert_eq!(bundle.model.amiibo_id, "01000000034C0902");
        assert_eq!(bundle.register.name, "Mario");
        assert_eq!(bundle.register.first_write_date, "2019-04-02");
        assert_eq!(bundle.common.last_write_date, "2020-12-31");
    }

    #[test]
    fn inspect_names_the_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        LegacyLayout::from_seed(2).write(tmp.path(), &record("Mario")).unwrap();
        fs::remove_file(tmp.path().join(REGISTER_JSON)).unwrap();

        let err = LegacyLayout::new().inspect(tmp.path()).unwrap_err();
        assert!(matches!(err, BundleError::LegacyField { file: REGISTER_JSON, .. }));
    }

    #[test]
    fn to_record_takes_uuid_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = LegacyLayout::from_seed(3);
        layout.write(tmp.path(), &record("Mario")).unwrap();

        let bundle = layout.inspect(tmp.path()).unwrap();
        let converted = bundle.to_record().unwrap();
        let expected = hex::decode(bundle.tag.uuid.as_deref().unwrap()).unwrap();
        assert_eq!(converted.uuid.to_vec(), expected);
        assert!(!converted.use_random_uuid);
        assert_eq!(converted.identity(), record("Mario").identity());
        assert_eq!(converted.first_write_date, CalendarDate::new(2019, 4, 2));
        assert!(!converted.has_areas());
    }

    #[test]
    fn short_tag_uuid_is_zero_filled() {
        assert_eq!(
            tag_uuid_bytes("ABCD").unwrap(),
            [0xAB, 0xCD, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(tag_uuid_bytes("ABC").unwrap()[..2], [0xAB, 0]);
        assert!(tag_uuid_bytes("ZZ").is_err());
    }

    #[test]
    fn read_reports_like_current_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = LegacyLayout::from_seed(4);
        layout.write(tmp.path(), &record("Princess Peach")).unwrap();

        let (status, read) = layout.read(tmp.path());
        assert!(status.contains(StatusKind::MiiCharInfoNotFound));
        assert!(status.contains(StatusKind::InvalidNameLength));
        assert_eq!(read.unwrap().name, "Princess Peach");

        fs::remove_file(tmp.path().join(COMMON_JSON)).unwrap();
        let (status, read) = layout.read(tmp.path());
        assert_eq!(status, StatusSet::only(StatusKind::JsonNotFound));
        assert!(read.is_none());
    }

    #[test]
    fn bad_date_is_a_record_error() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = LegacyLayout::from_seed(4);
        layout.write(tmp.path(), &record("Mario")).unwrap();
        fs::write(
            tmp.path().join(COMMON_JSON),
            r#"{"lastWriteDate": "31/12/2020", "writeCounter": 0, "version": 0}"#,
        )
        .unwrap();

        let err = layout.inspect(tmp.path()).unwrap().to_record().unwrap_err();
        assert!(matches!(err, BundleError::Record(RecordError::Codec(_))));
    }

    #[test]
    fn lowercase_catalog_id_is_written_uppercase() {
        let tmp = tempfile::tempdir().unwrap();
        let identity = HexIdentity::from_hex(&format!("{}{}", "01000000", "034c0902")).unwrap();
        let lower = FigureRecord::new(identity, "Mario", [7; 10], CalendarDate::new(2019, 4, 2));
        LegacyLayout::from_seed(5).write(tmp.path(), &lower).unwrap();

        assert_eq!(raw(tmp.path(), MODEL_JSON)["amiiboId"], "01000000034C0902");
        let back = LegacyLayout::from_seed(5).inspect(tmp.path()).unwrap().to_record().unwrap();
        assert_eq!(back.identity(), identity);
    }
}
