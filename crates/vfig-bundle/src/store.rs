use std::fs;
use std::path::Path;

use vfig_record::{FigureRecord, StatusKind, StatusSet};

use crate::current::CurrentLayout;
use crate::error::{BundleError, BundleResult};
use crate::files;
use crate::layout::{BundleLayout, LayoutKind};
use crate::legacy::LegacyLayout;

/// Reads and writes figure bundles in either layout.
///
/// The store holds no state about any directory; every call works on the
/// path it is given and assumes exclusive use of it for the call.
#[derive(Debug, Default)]
pub struct BundleStore {
    current: CurrentLayout,
    legacy: LegacyLayout,
}

impl BundleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose legacy writer uses the given layout (and its generator).
    pub fn with_legacy(legacy: LegacyLayout) -> Self {
        Self {
            current: CurrentLayout,
            legacy,
        }
    }

    pub fn layout(&self, kind: LayoutKind) -> &dyn BundleLayout {
        match kind {
            LayoutKind::Current => &self.current,
            LayoutKind::Legacy => &self.legacy,
        }
    }

    pub fn legacy(&self) -> &LegacyLayout {
        &self.legacy
    }

    /// Write `record` to `dir` in the given layout, replacing anything there.
    pub fn write(&self, dir: &Path, record: &FigureRecord, kind: LayoutKind) -> BundleResult<()> {
        self.layout(kind).write(dir, record)
    }

    /// Read the bundle at `dir` assuming the given layout.
    pub fn read(&self, dir: &Path, kind: LayoutKind) -> (StatusSet, Option<FigureRecord>) {
        self.layout(kind).read(dir)
    }

    /// Read the bundle at `dir` in whichever layout it has.
    pub fn read_any(&self, dir: &Path) -> (StatusSet, Option<FigureRecord>) {
        match LayoutKind::detect(dir) {
            Some(kind) => self.read(dir, kind),
            None => {
                tracing::warn!(path = %dir.display(), "no bundle found");
                (StatusSet::only(StatusKind::JsonNotFound), None)
            }
        }
    }

    /// Write `record` to `dir` like [`write`](Self::write), keeping every
    /// top-level file that neither layout owns (mii data, images, user files).
    pub fn rewrite(&self, dir: &Path, record: &FigureRecord, kind: LayoutKind) -> BundleResult<()> {
        let owned: Vec<&str> = [LayoutKind::Current, LayoutKind::Legacy]
            .into_iter()
            .flat_map(|k| self.layout(k).owned_files().iter().copied())
            .collect();
        let side = files::read_side_files(dir, &owned)?;
        self.write(dir, record, kind)?;
        files::write_side_files(dir, &side)?;

        tracing::debug!(path = %dir.display(), kept = side.len(), "rewrote bundle");
        Ok(())
    }

    /// Convert the legacy bundle at `src` into a current bundle at `dst`.
    ///
    /// `src` is left untouched, so `dst` may be neither `src` itself nor
    /// inside or above it. The mii data file is copied along when the
    /// source has one under a plain file name.
    pub fn upgrade(&self, src: &Path, dst: &Path) -> BundleResult<FigureRecord> {
        let (real_src, real_dst) = (files::resolve(src), files::resolve(dst));
        if real_src == real_dst {
            return Err(BundleError::SamePath(dst.to_path_buf()));
        }
        if real_src.starts_with(&real_dst) || real_dst.starts_with(&real_src) {
            return Err(BundleError::NestedPath {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
            });
        }
        if LayoutKind::detect(src) != Some(LayoutKind::Legacy) {
            return Err(BundleError::NotABundle(src.to_path_buf()));
        }

        let record = self.legacy.inspect(src)?.to_record()?;
        let mii = read_mii(src, &record.mii_data_filename)?;
        self.current.write(dst, &record)?;

        if let Some(bytes) = mii {
            let target = dst.join(&record.mii_data_filename);
            fs::write(&target, bytes).map_err(|e| BundleError::WriteFailed {
                path: target,
                reason: e.to_string(),
            })?;
        }

        tracing::info!(
            src = %src.display(),
            dst = %dst.display(),
            identity = %record.identity(),
            "upgraded legacy bundle"
        );
        Ok(record)
    }
}

/// The mii data stored next to a bundle, if `name` is a plain file there.
fn read_mii(dir: &Path, name: &str) -> BundleResult<Option<Vec<u8>>> {
    if !files::is_local_file_name(name) {
        tracing::warn!(path = %dir.display(), file = name, "ignoring mii file outside the bundle");
        return Ok(None);
    }
    let path = dir.join(name);
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(fs::read(path)?))
}
