//! # fetchkit
//!
//! Download release archives and unpack them into an install directory.
//!
//! This crate provides functionality for:
//! - Downloading an archive to a local file over HTTP(S)
//! - Extracting zip, tar.gz and tar.zst archives with path sanitization
//! - Stripping leading archive path components (like `tar --strip-components`)
//!
//! ## Example
//!
//! ```no_run
//! use fetchkit::{Client, ExtractOptions};
//! use std::path::Path;
//!
//! let client = Client::new();
//!
//! let archive = Path::new("/tmp/poppler.zip");
//! client
//!     .download_to("https://example.com/poppler.zip", archive)
//!     .expect("download failed");
//!
//! let summary = client
//!     .extract(archive, Path::new("/opt/poppler"), &ExtractOptions::new().strip_components(1))
//!     .expect("extraction failed");
//! println!("Extracted {} files", summary.files);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod backend;
pub mod error;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use types::{ArchiveFormat, ExtractOptions, ExtractSummary};

pub use backend::MockBackend;
use backend::Backend;
use backend::http::HttpBackend;
use std::fs;
use std::path::{Path, PathBuf};

/// High-level client for download and extraction.
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create a new Client with the default HTTP backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: Box::new(HttpBackend::new()),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Download `url` to `dest`, returning the number of bytes written.
    ///
    /// The body is written to a sibling `.part` file first and renamed
    /// into place, so `dest` only ever exists once the download is
    /// complete. Parent directories are created as needed.
    pub fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        let bytes = self.backend.fetch(url)?;

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let partial = partial_path(dest);
        fs::write(&partial, &bytes).map_err(|e| Error::io(&partial, e))?;
        fs::rename(&partial, dest).map_err(|e| {
            let _ = fs::remove_file(&partial);
            Error::io(dest, e)
        })?;

        log::info!("Saved {} bytes to {}", bytes.len(), dest.display());
        Ok(bytes.len() as u64)
    }

    /// Extract `archive` into `dest`.
    pub fn extract(
        &self,
        archive: &Path,
        dest: &Path,
        options: &ExtractOptions,
    ) -> Result<ExtractSummary> {
        archive::extract(archive, dest, options)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// `poppler.zip` -> `poppler.zip.part`
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_download_to_creates_parent_and_file() {
        let tmp = TempDir::new().unwrap();
        let mock = MockBackend::new();
        mock.add_asset("https://example.com/a.zip", b"archive".to_vec());
        let client = Client::with_backend(Box::new(mock.clone()));

        let dest = tmp.path().join("Downloads").join("a.zip");
        let written = client.download_to("https://example.com/a.zip", &dest).unwrap();

        assert_eq!(written, 7);
        assert_eq!(fs::read(&dest).unwrap(), b"archive");
        assert!(!partial_path(&dest).exists());
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_failed_download_leaves_no_file() {
        let tmp = TempDir::new().unwrap();
        let client = Client::with_backend(Box::new(MockBackend::new()));

        let dest = tmp.path().join("a.zip");
        let err = client
            .download_to("https://example.com/a.zip", &dest)
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(!dest.exists());
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/tmp/poppler.zip")),
            PathBuf::from("/tmp/poppler.zip.part")
        );
    }
}
