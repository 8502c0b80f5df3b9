//! Creating bundles from catalog entries, one at a time or in bulk.

use std::path::{Path, PathBuf};

use rand::Rng;
use vfig_record::{FigureRecord, DEFAULT_MII_CHARINFO_FILE};
use vfig_types::{names, Catalog, CatalogEntry};

use crate::error::{BundleError, BundleResult};
use crate::layout::LayoutKind;
use crate::store::BundleStore;

/// How generated bundles are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    pub layout: LayoutKind,
    pub use_random_uuid: bool,
    pub mii_charinfo_file: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            layout: LayoutKind::Current,
            use_random_uuid: false,
            mii_charinfo_file: DEFAULT_MII_CHARINFO_FILE.to_string(),
        }
    }
}

/// Outcome of a bulk generation.
#[derive(Clone, Debug, Default)]
pub struct GenerateReport {
    /// Bundle directories written.
    pub written: Vec<PathBuf>,
    /// `(entry name, reason)` for every entry that was skipped.
    pub failed: Vec<(String, String)>,
}

impl GenerateReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, entry: &CatalogEntry, result: BundleResult<PathBuf>) {
        match result {
            Ok(path) => self.written.push(path),
            Err(e) => self.skip(entry, e.to_string()),
        }
    }

    fn skip(&mut self, entry: &CatalogEntry, reason: String) {
        tracing::warn!(entry = %entry.name, reason = %reason, "skipping catalog entry");
        self.failed.push((entry.name.clone(), reason));
    }
}

pub fn validate_figure_name(name: &str) -> BundleResult<()> {
    if name.trim().is_empty() {
        return Err(BundleError::InvalidName("name must not be empty".into()));
    }
    Ok(())
}

/// A directory name must be a single non-empty path segment.
pub fn validate_directory_name(name: &str) -> BundleResult<()> {
    if name.trim().is_empty() {
        return Err(BundleError::InvalidDirectory("directory name must not be empty".into()));
    }
    if name.contains(['/', '\\']) {
        return Err(BundleError::InvalidDirectory(format!(
            "'{name}' contains a path separator"
        )));
    }
    Ok(())
}

/// Sanitized segment, rejected when nothing usable is left. Writing to an
/// empty segment would replace the parent directory.
fn directory_segment(raw: &str) -> BundleResult<String> {
    validate_directory_name(raw)?;
    let segment = names::sanitize_for_filesystem(raw);
    if segment.is_empty() {
        return Err(BundleError::InvalidDirectory(format!(
            "'{raw}' has no usable characters"
        )));
    }
    Ok(segment)
}

impl BundleStore {
    /// Write one bundle for `entry` named `name` into
    /// `root / sanitize(dir_name)` and return that path.
    ///
    /// Both names are validated before anything touches the disk. The figure
    /// name is cut to the length cap.
    pub fn generate_one<R: Rng + ?Sized>(
        &self,
        root: &Path,
        dir_name: &str,
        entry: &CatalogEntry,
        name: &str,
        options: &GenerateOptions,
        rng: &mut R,
    ) -> BundleResult<PathBuf> {
        validate_figure_name(name)?;
        let dir = root.join(directory_segment(dir_name)?);
        self.generate_into(&dir, entry, name, options, rng)?;
        Ok(dir)
    }

    /// Write every entry of one series, each into `root / sanitize(name)`
    /// with a name derived from the entry's.
    pub fn generate_series<R: Rng + ?Sized>(
        &self,
        root: &Path,
        entries: &[CatalogEntry],
        options: &GenerateOptions,
        rng: &mut R,
    ) -> GenerateReport {
        let mut report = GenerateReport::default();
        for entry in entries {
            let result = self.generate_derived(root, entry, options, rng);
            report.record(entry, result);
        }
        tracing::info!(
            root = %root.display(),
            written = report.written.len(),
            failed = report.failed.len(),
            "generated series"
        );
        report
    }

    /// Write the whole catalog as `root / sanitize(series) / sanitize(name)`.
    pub fn generate_all<R: Rng + ?Sized>(
        &self,
        root: &Path,
        catalog: &Catalog,
        options: &GenerateOptions,
        rng: &mut R,
    ) -> GenerateReport {
        let mut report = GenerateReport::default();
        for (series, entries) in catalog.by_series() {
            match directory_segment(&series) {
                Ok(segment) => {
                    let series_root = root.join(segment);
                    for entry in &entries {
                        let result = self.generate_derived(&series_root, entry, options, rng);
                        report.record(entry, result);
                    }
                }
                Err(e) => {
                    let reason = e.to_string();
                    for entry in &entries {
                        report.skip(entry, reason.clone());
                    }
                }
            }
        }
        tracing::info!(
            root = %root.display(),
            written = report.written.len(),
            failed = report.failed.len(),
            "generated catalog"
        );
        report
    }

    fn generate_derived<R: Rng + ?Sized>(
        &self,
        root: &Path,
        entry: &CatalogEntry,
        options: &GenerateOptions,
        rng: &mut R,
    ) -> BundleResult<PathBuf> {
        self.generate_one(
            root,
            &entry.name,
            entry,
            &names::derive_short_name(&entry.name),
            options,
            rng,
        )
    }

    fn generate_into<R: Rng + ?Sized>(
        &self,
        dir: &Path,
        entry: &CatalogEntry,
        name: &str,
        options: &GenerateOptions,
        rng: &mut R,
    ) -> BundleResult<()> {
        let mut record = FigureRecord::build(entry, name, rng)?;
        record.rename(name);
        record.use_random_uuid = options.use_random_uuid;
        record.mii_data_filename = options.mii_charinfo_file.clone();

        self.write(dir, &record, options.layout)?;
        tracing::debug!(path = %dir.display(), name = %record.name, layout = %options.layout, "generated bundle");
        Ok(())
    }
}
