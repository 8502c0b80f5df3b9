use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use vfig_bundle::{GenerateOptions, LayoutKind};
use vfig_record::DEFAULT_MII_CHARINFO_FILE;

use crate::cli::OutputArgs;

/// Settings read from `--config`. Every key is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub output_root: PathBuf,
    pub layout: LayoutKind,
    pub use_random_uuid: bool,
    pub mii_charinfo_file: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            layout: LayoutKind::Current,
            use_random_uuid: false,
            mii_charinfo_file: DEFAULT_MII_CHARINFO_FILE.to_string(),
        }
    }
}

impl CliConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("in config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// The file at `path` if given, defaults otherwise.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Command-line flags win over file values.
    pub fn apply(&mut self, args: &OutputArgs) {
        if let Some(output) = &args.output {
            self.output_root = output.clone();
        }
        if let Some(layout) = args.layout {
            self.layout = layout;
        }
        if args.random_uuid {
            self.use_random_uuid = true;
        }
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            layout: self.layout,
            use_random_uuid: self.use_random_uuid,
            mii_charinfo_file: self.mii_charinfo_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CliConfig::default();
        assert_eq!(c.output_root, PathBuf::from("."));
        assert_eq!(c.layout, LayoutKind::Current);
        assert!(!c.use_random_uuid);
        assert_eq!(c.mii_charinfo_file, "mii-charinfo.bin");
        assert_eq!(c.generate_options(), GenerateOptions::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c = CliConfig::from_toml("layout = \"legacy\"\noutput_root = \"/sd/emuiibo/amiibo\"\n").unwrap();
        assert_eq!(c.layout, LayoutKind::Legacy);
        assert_eq!(c.output_root, PathBuf::from("/sd/emuiibo/amiibo"));
        assert!(!c.use_random_uuid);
        assert_eq!(c.mii_charinfo_file, "mii-charinfo.bin");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(CliConfig::from_toml("layout = \"v2\"").is_err());
        assert!(CliConfig::from_toml("use_random_uuid = \"yes\"").is_err());
        assert!(CliConfig::from_toml("colour = true").is_err());
    }

    #[test]
    fn flags_override_file() {
        let mut c = CliConfig::from_toml("use_random_uuid = true\nlayout = \"legacy\"").unwrap();
        c.apply(&OutputArgs {
            output: Some(PathBuf::from("out")),
            layout: Some(LayoutKind::Current),
            random_uuid: false,
        });
        assert_eq!(c.output_root, PathBuf::from("out"));
        assert_eq!(c.layout, LayoutKind::Current);
        // An absent flag does not clear a value set in the file.
        assert!(c.use_random_uuid);
    }

    #[test]
    fn load_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("vfig.toml");
        std::fs::write(&path, "mii_charinfo_file = \"mii.bin\"\n").unwrap();

        let c = CliConfig::resolve(Some(&path)).unwrap();
        assert_eq!(c.mii_charinfo_file, "mii.bin");
        assert_eq!(CliConfig::resolve(None).unwrap(), CliConfig::default());
        assert!(CliConfig::load(&tmp.path().join("missing.toml")).is_err());
    }

    #[test]
    fn serializes_back_to_toml() {
        let text = toml::to_string(&CliConfig::default()).unwrap();
        assert_eq!(CliConfig::from_toml(&text).unwrap(), CliConfig::default());
    }
}
