//! Core types for download and extraction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported archive formats.
///
/// # Example
///
/// ```
/// use fetchkit::ArchiveFormat;
/// use std::path::Path;
///
/// assert_eq!(
///     ArchiveFormat::from_path(Path::new("Release-24.08.0-0.zip")),
///     Some(ArchiveFormat::Zip)
/// );
/// assert_eq!(
///     ArchiveFormat::from_path(Path::new("tool.tar.gz")),
///     Some(ArchiveFormat::TarGz)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveFormat {
    /// PKZIP archive (`.zip`).
    Zip,
    /// Gzip-compressed tarball (`.tar.gz`, `.tgz`).
    TarGz,
    /// Zstd-compressed tarball (`.tar.zst`, `.tzst`).
    TarZst,
}

impl ArchiveFormat {
    /// Detect the format from a file name.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar.zst") || name.ends_with(".tzst") {
            Some(Self::TarZst)
        } else {
            None
        }
    }

    /// Detect the format from the leading magic bytes.
    #[must_use]
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b'P', b'K', 0x03, 0x04, ..] => Some(Self::Zip),
            [0x1f, 0x8b, ..] => Some(Self::TarGz),
            [0x28, 0xb5, 0x2f, 0xfd, ..] => Some(Self::TarZst),
            _ => None,
        }
    }

    /// Short display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::TarZst => "tar.zst",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Options for archive extraction.
///
/// # Example
///
/// ```
/// use fetchkit::ExtractOptions;
///
/// let options = ExtractOptions::new().strip_components(1);
/// assert_eq!(options.strip_components, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Number of leading path components dropped from every entry.
    ///
    /// Entries with no components left after stripping are skipped.
    pub strip_components: usize,

    /// Force a format instead of detecting it.
    pub format: Option<ArchiveFormat>,
}

impl ExtractOptions {
    /// Create default options (no stripping, detect format).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of leading components to strip.
    #[must_use]
    pub fn strip_components(mut self, count: usize) -> Self {
        self.strip_components = count;
        self
    }

    /// Force the archive format.
    #[must_use]
    pub fn format(mut self, format: ArchiveFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// What an extraction wrote to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractSummary {
    /// Detected or forced format.
    pub format: Option<ArchiveFormat>,
    /// Regular files written.
    pub files: usize,
    /// Directories created.
    pub directories: usize,
    /// Entries skipped (stripped away or unsupported entry types).
    pub skipped: usize,
    /// Total bytes of file content written.
    pub bytes: u64,
}
