//! Small filesystem helpers shared by the layouts.
//!
//! Every helper used on the write path reports failures as
//! [`BundleError::WriteFailed`] carrying the offending path.

use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BundleError, BundleResult};

fn write_failed(path: &Path, reason: impl ToString) -> BundleError {
    BundleError::WriteFailed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Remove `dir` if present, then create it (and its parents) empty.
pub(crate) fn recreate_dir(dir: &Path) -> BundleResult<()> {
    if dir.exists() {
        tracing::debug!(path = %dir.display(), "removing existing bundle directory");
        fs::remove_dir_all(dir).map_err(|e| write_failed(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| write_failed(dir, e))
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> BundleResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| write_failed(path, e))?;
    fs::write(path, text).map_err(|e| write_failed(path, e))
}

/// Create a zero-length file.
pub(crate) fn touch(path: &Path) -> BundleResult<()> {
    fs::write(path, b"").map_err(|e| write_failed(path, e))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> BundleResult<T> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Whether `name` is one plain file name, so joining it onto a bundle
/// directory stays inside that directory.
pub(crate) fn is_local_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Absolute form of `path` with every existing prefix canonicalized.
/// The path itself does not need to exist.
pub(crate) fn resolve(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    for ancestor in absolute.ancestors() {
        if let Ok(real) = ancestor.canonicalize() {
            return match absolute.strip_prefix(ancestor) {
                Ok(rest) => real.join(rest),
                Err(_) => real,
            };
        }
    }
    absolute
}

/// Top-level regular files in `dir` other than `owned`, with their bytes.
pub(crate) fn read_side_files(dir: &Path, owned: &[&str]) -> BundleResult<Vec<(OsString, Vec<u8>)>> {
    let mut side = Vec::new();
    if !dir.is_dir() {
        return Ok(side);
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !entry.file_type()?.is_file() || owned.iter().any(|o| name == *o) {
            continue;
        }
        side.push((name, fs::read(entry.path())?));
    }
    Ok(side)
}

pub(crate) fn write_side_files(dir: &Path, side: &[(OsString, Vec<u8>)]) -> BundleResult<()> {
    for (name, bytes) in side {
        let path = dir.join(name);
        fs::write(&path, bytes).map_err(|e| write_failed(&path, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_file_names() {
        assert!(is_local_file_name("mii-charinfo.bin"));
        assert!(!is_local_file_name("./mii.bin"));
        assert!(!is_local_file_name(""));
        assert!(!is_local_file_name(".."));
        assert!(!is_local_file_name("../victim.txt"));
        assert!(!is_local_file_name("/etc/passwd"));
        assert!(!is_local_file_name("sub/mii.bin"));
    }

    #[test]
    fn resolve_handles_missing_tail() {
        let tmp = tempfile::tempdir().unwrap();
        let real = tmp.path().canonicalize().unwrap();
        assert_eq!(resolve(tmp.path()), real);
        assert_eq!(resolve(&tmp.path().join("a").join("b")), real.join("a").join("b"));
        assert_eq!(resolve(&tmp.path().join(".")), real);
    }

    #[test]
    fn side_files_skip_owned_names_and_directories() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("amiibo.json"), "{}").unwrap();
        fs::write(tmp.path().join("amiibo.png"), [1u8, 2]).unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();

        let side = read_side_files(tmp.path(), &["amiibo.json"]).unwrap();
        assert_eq!(side, vec![(OsString::from("amiibo.png"), vec![1, 2])]);
        assert!(read_side_files(&tmp.path().join("missing"), &[]).unwrap().is_empty());
    }

    #[test]
    fn recreate_dir_wipes_previous_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.txt"), "x").unwrap();

        recreate_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn touch_creates_empty_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("marker");
        touch(&path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn write_into_missing_directory_is_write_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("x.json");
        let err = write_json(&path, &serde_json::json!({"a": 1})).unwrap_err();
        assert!(matches!(err, BundleError::WriteFailed { path: p, .. } if p == path));
    }

    #[test]
    fn read_json_distinguishes_io_and_parse() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = read_json::<serde_json::Value>(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, BundleError::Io(_)));

        let bad = tmp.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        let err = read_json::<serde_json::Value>(&bad).unwrap_err();
        assert!(matches!(err, BundleError::Serialization(_)));
    }
}
