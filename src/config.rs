//! Configuration file (`provision.toml`)
//!
//! Every field is optional; a missing file means the built-in defaults,
//! so both commands run with no arguments and no config at all.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

pub const DEFAULT_URL: &str = "https://github.com/oschwartz10612/poppler-windows/releases/download/v24.08.0-0/Release-24.08.0-0.zip";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub install: InstallConfig,
    pub purge: PurgeConfig,
}

/// `[install]`: the fetch-and-install plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Archive download URL
    pub url: String,
    /// Where the archive is saved
    pub archive: String,
    /// Directory the archive is extracted into
    pub install_dir: String,
    /// Leading archive path components to drop
    pub strip_components: usize,
    /// Directory (relative to `install_dir`) added to the search path
    pub bin_subdir: String,
    /// User environment variable holding the search path
    pub path_variable: String,
    /// Verification command; the first element is the program
    pub verify: Vec<String>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            archive: "~/Downloads/poppler.zip".to_string(),
            install_dir: default_install_dir().to_string(),
            strip_components: 1,
            bin_subdir: "Library/bin".to_string(),
            path_variable: default_path_variable().to_string(),
            verify: vec!["pdftoppm".to_string(), "-v".to_string()],
        }
    }
}

/// `[purge]`: the purge-all-but-one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    /// Package manager command prefix
    pub command: Vec<String>,
    /// Package that is never removed
    pub exempt: String,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            command: vec!["pip".to_string()],
            exempt: "pip".to_string(),
        }
    }
}

fn default_install_dir() -> &'static str {
    if cfg!(windows) {
        r"C:\poppler"
    } else {
        "~/.local/opt/poppler"
    }
}

fn default_path_variable() -> &'static str {
    if cfg!(windows) { "Path" } else { "PATH" }
}

/// Install settings with paths expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSettings {
    pub url: String,
    pub archive: PathBuf,
    pub install_dir: PathBuf,
    pub strip_components: usize,
    pub bin_dir: PathBuf,
    pub path_variable: String,
    pub verify_program: String,
    pub verify_args: Vec<String>,
}

impl Config {
    /// Load from `explicit` if given, else from the default location.
    ///
    /// An explicit path must exist; the default one may be missing.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, PathBuf)> {
        let path = Self::location(explicit)?;
        if explicit.is_some() && !path.exists() {
            bail!("Config file not found: {}", path.display());
        }

        if path.exists() {
            Ok((Self::load_from(&path)?, path))
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok((Self::default(), path))
        }
    }

    /// Where the config is read from: `explicit` or the default location.
    pub fn location(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => paths::config_file(),
        }
    }

    /// Parse a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.install.url.trim().is_empty() {
            bail!("[install].url must not be empty");
        }
        if self.install.verify.first().is_none_or(|p| p.trim().is_empty()) {
            bail!("[install].verify must name a program");
        }
        if self.install.path_variable.trim().is_empty() {
            bail!("[install].path_variable must not be empty");
        }
        if self.purge.command.first().is_none_or(|p| p.trim().is_empty()) {
            bail!("[purge].command must name a program");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

impl InstallConfig {
    /// Expand paths and split the verification command.
    pub fn resolve(&self) -> Result<InstallSettings> {
        let Some((program, args)) = self.verify.split_first() else {
            bail!("[install].verify must name a program");
        };
        let install_dir = paths::expand(&self.install_dir);
        let bin_dir = if self.bin_subdir.trim().is_empty() {
            install_dir.clone()
        } else {
            install_dir.join(native_relative(&self.bin_subdir))
        };

        Ok(InstallSettings {
            url: self.url.clone(),
            archive: paths::expand(&self.archive),
            install_dir,
            strip_components: self.strip_components,
            bin_dir,
            path_variable: self.path_variable.clone(),
            verify_program: program.clone(),
            verify_args: args.to_vec(),
        })
    }
}

/// `Library/bin` -> `Library\bin` on Windows, unchanged elsewhere
fn native_relative(relative: &str) -> PathBuf {
    relative
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.install.url, DEFAULT_URL);
        assert_eq!(config.install.strip_components, 1);
        assert_eq!(config.install.verify, vec!["pdftoppm", "-v"]);
        assert_eq!(config.purge.exempt, "pip");
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
[install]
install_dir = "/opt/poppler"

[purge]
exempt = "setuptools"
"#,
        )
        .unwrap();

        assert_eq!(config.install.install_dir, "/opt/poppler");
        assert_eq!(config.install.url, DEFAULT_URL);
        assert_eq!(config.purge.exempt, "setuptools");
        assert_eq!(config.purge.command, vec!["pip"]);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_empty_verify() {
        let err = Config::parse("[install]\nverify = []\n").unwrap_err();
        assert!(err.to_string().contains("verify"));
    }

    #[test]
    fn test_rejects_unknown_types() {
        assert!(Config::parse("[install]\nstrip_components = \"one\"\n").is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_load_explicit_missing() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_explicit() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("provision.toml");
        fs::write(&path, "[purge]\ncommand = [\"python\", \"-m\", \"pip\"]\n").unwrap();

        let (config, loaded_from) = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded_from, path);
        assert_eq!(config.purge.command, vec!["python", "-m", "pip"]);
    }

    #[test]
    fn test_resolve_install_settings() {
        let config = InstallConfig {
            install_dir: "/opt/poppler".to_string(),
            archive: "/tmp/poppler.zip".to_string(),
            ..InstallConfig::default()
        };
        let settings = config.resolve().unwrap();

        assert_eq!(settings.archive, PathBuf::from("/tmp/poppler.zip"));
        assert_eq!(
            settings.bin_dir,
            PathBuf::from("/opt/poppler").join("Library").join("bin")
        );
        assert_eq!(settings.verify_program, "pdftoppm");
        assert_eq!(settings.verify_args, vec!["-v"]);
    }

    #[test]
    fn test_resolve_empty_bin_subdir() {
        let config = InstallConfig {
            install_dir: "/opt/tool".to_string(),
            bin_subdir: String::new(),
            ..InstallConfig::default()
        };
        assert_eq!(config.resolve().unwrap().bin_dir, PathBuf::from("/opt/tool"));
    }
}
