//! Concrete provisioning steps
//!
//! Each step pairs a precondition with an effect:
//! - `download-archive` - skipped when the archive file already exists
//! - `create-install-dir` - skipped when the directory already exists
//! - `extract-archive` - always runs, overwriting in place
//! - `add-to-path` - skipped when the bin directory is already on the variable
//! - `verify-install` - always runs
//! - `uninstall:<name>` - always runs; failures don't stop the plan

mod directory;
mod download;
mod extract;
mod path_entry;
mod uninstall;
mod verify;

pub use directory::CreateInstallDir;
pub use download::DownloadArchive;
pub use extract::ExtractArchive;
pub use path_entry::AddToPath;
pub use uninstall::UninstallPackage;
pub use verify::VerifyInstall;

use provisioner::Error;

/// Map a download failure into the step taxonomy.
///
/// Local write failures are filesystem errors; everything else happened
/// on the wire.
pub(crate) fn download_error(url: &str, err: fetchkit::Error) -> Error {
    match err {
        fetchkit::Error::Io { path, source } => Error::io(path, source),
        other => Error::network(url, other.to_string()),
    }
}

/// Map an extraction failure into the step taxonomy.
pub(crate) fn extract_error(archive: &std::path::Path, err: fetchkit::Error) -> Error {
    match err {
        fetchkit::Error::Io { path, source } if path != archive => Error::io(path, source),
        other => Error::Extraction {
            archive: archive.to_path_buf(),
            message: other.to_string(),
        },
    }
}
