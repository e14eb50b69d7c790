use fetchkit::ExtractOptions;
use provisioner::{Result, Step, StepContext};
use std::path::PathBuf;

use super::extract_error;

/// Unpack the archive into the install directory
///
/// Runs on every invocation; existing files are overwritten, files not in
/// the archive are left alone.
#[derive(Debug, Clone)]
pub struct ExtractArchive {
    pub archive: PathBuf,
    pub dest: PathBuf,
    pub options: ExtractOptions,
}

impl ExtractArchive {
    pub fn new(archive: impl Into<PathBuf>, dest: impl Into<PathBuf>, strip_components: usize) -> Self {
        Self {
            archive: archive.into(),
            dest: dest.into(),
            options: ExtractOptions::new().strip_components(strip_components),
        }
    }
}

impl Step for ExtractArchive {
    fn name(&self) -> String {
        "extract-archive".to_string()
    }

    fn description(&self) -> String {
        format!(
            "Extracting {} into {}",
            self.archive.display(),
            self.dest.display()
        )
    }

    fn kind(&self) -> &'static str {
        "extract"
    }

    fn apply(&self, _ctx: &mut StepContext) -> Result<String> {
        let summary = fetchkit::archive::extract(&self.archive, &self.dest, &self.options)
            .map_err(|e| extract_error(&self.archive, e))?;

        let format = summary
            .format
            .map(|f| f.name().to_string())
            .unwrap_or_else(|| "archive".to_string());
        Ok(format!(
            "unpacked {} files from {} ({})",
            summary.files,
            format,
            crate::ui::format_size(summary.bytes)
        ))
    }
}
