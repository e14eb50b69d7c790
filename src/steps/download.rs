use provisioner::{Result, Step, StepContext};
use std::fmt;
use std::path::PathBuf;

use super::download_error;
use crate::ui;

/// Fetch the archive unless it is already on disk
///
/// Existence is the only check; a stale or corrupt archive is reused and
/// surfaces as an extraction error.
pub struct DownloadArchive {
    pub url: String,
    pub archive: PathBuf,
    client: fetchkit::Client,
}

impl DownloadArchive {
    pub fn new(url: impl Into<String>, archive: impl Into<PathBuf>, client: fetchkit::Client) -> Self {
        Self {
            url: url.into(),
            archive: archive.into(),
            client,
        }
    }
}

impl fmt::Debug for DownloadArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadArchive")
            .field("url", &self.url)
            .field("archive", &self.archive)
            .finish_non_exhaustive()
    }
}

impl Step for DownloadArchive {
    fn name(&self) -> String {
        "download-archive".to_string()
    }

    fn description(&self) -> String {
        format!("Downloading {}", self.url)
    }

    fn kind(&self) -> &'static str {
        "download"
    }

    fn is_satisfied(&self, _ctx: &StepContext) -> Result<bool> {
        let exists = self.archive.is_file();
        log::debug!("{} exists: {}", self.archive.display(), exists);
        Ok(exists)
    }

    fn skip_reason(&self) -> String {
        format!("{} already downloaded", self.archive.display())
    }

    fn apply(&self, _ctx: &mut StepContext) -> Result<String> {
        let bytes = self
            .client
            .download_to(&self.url, &self.archive)
            .map_err(|e| download_error(&self.url, e))?;
        Ok(format!(
            "saved {} to {}",
            ui::format_size(bytes),
            self.archive.display()
        ))
    }
}
