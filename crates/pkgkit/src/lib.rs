//! # pkgkit
//!
//! List and uninstall packages through a package manager CLI.
//!
//! The only real backend today is pip. Commands are executed through a
//! [`provisioner::CommandRunner`], so everything here runs against a
//! [`provisioner::MockRunner`] in tests.
//!
//! ## Example
//!
//! ```no_run
//! use pkgkit::Client;
//! # struct Runner;
//! # impl provisioner::CommandRunner for Runner {
//! #     fn execute(&self, _: &str, _: &[&str]) -> provisioner::Result<provisioner::CommandOutput> {
//! #         Ok(provisioner::CommandOutput::ok("[]"))
//! #     }
//! # }
//! # let runner = Runner;
//!
//! let client = Client::new();
//! for pkg in client.purge_candidates(&runner, "pip").expect("listing failed") {
//!     client.uninstall(&runner, &pkg.name).expect("uninstall failed");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::MockBackend;
pub use error::{Error, ErrorCategory, Result};
pub use types::{InstalledPackage, normalize_name, same_package};

use backend::{Backend, pip::PipBackend};
use provisioner::CommandRunner;
use std::fmt;
use std::sync::Arc;

/// High-level client for package manager operations.
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct Client {
    backend: Arc<dyn Backend>,
}

impl Client {
    /// Create a client driving `pip` from PATH.
    pub fn new() -> Self {
        Self {
            backend: Arc::new(PipBackend::new()),
        }
    }

    /// Create a pip client with a custom command prefix.
    pub fn pip(command: Vec<String>) -> Result<Self> {
        Ok(Self {
            backend: Arc::new(PipBackend::with_command(command)?),
        })
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Backend name for messages.
    pub fn manager(&self) -> &str {
        self.backend.name()
    }

    /// List all installed packages.
    pub fn list_installed(&self, runner: &dyn CommandRunner) -> Result<Vec<InstalledPackage>> {
        self.backend.list_installed(runner)
    }

    /// Uninstall a package.
    pub fn uninstall(&self, runner: &dyn CommandRunner, name: &str) -> Result<()> {
        log::info!("Uninstalling {} via {}", name, self.backend.name());
        self.backend.uninstall(runner, name)
    }

    /// Installed packages other than `exempt`, in listing order.
    ///
    /// Names are compared after [`normalize_name`].
    pub fn purge_candidates(
        &self,
        runner: &dyn CommandRunner,
        exempt: &str,
    ) -> Result<Vec<InstalledPackage>> {
        let installed = self.backend.list_installed(runner)?;
        let total = installed.len();
        let candidates: Vec<_> = installed.into_iter().filter(|p| !p.is(exempt)).collect();
        log::debug!(
            "{} of {} installed packages are purge candidates (exempt: {})",
            candidates.len(),
            total,
            exempt
        );
        Ok(candidates)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("manager", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provisioner::{CommandOutput, MockRunner};

    #[test]
    fn test_purge_candidates_excludes_exempt() {
        let runner = MockRunner::new();
        let client = Client::with_backend(MockBackend::with_packages(["pip", "requests", "six"]));

        let names: Vec<_> = client
            .purge_candidates(&runner, "pip")
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["requests", "six"]);
    }

    #[test]
    fn test_purge_candidates_normalizes_exempt() {
        let runner = MockRunner::new();
        let client = Client::with_backend(MockBackend::with_packages(["Typing_Extensions", "six"]));

        let candidates = client.purge_candidates(&runner, "typing-extensions").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "six");
    }

    #[test]
    fn test_purge_candidates_empty() {
        let runner = MockRunner::new();
        let client = Client::with_backend(MockBackend::new());
        assert!(client.purge_candidates(&runner, "pip").unwrap().is_empty());
    }

    #[test]
    fn test_pip_client_lists_through_runner() {
        let runner = MockRunner::new();
        runner.respond(
            "pip list --format=json",
            CommandOutput::ok(r#"[{"name": "pip", "version": "24.0"}, {"name": "wheel", "version": "0.43.0"}]"#),
        );

        let client = Client::new();
        let candidates = client.purge_candidates(&runner, "pip").unwrap();
        assert_eq!(candidates, vec![InstalledPackage::new("wheel", "0.43.0")]);
        assert_eq!(client.manager(), "pip");
    }

    #[test]
    fn test_clones_share_backend() {
        let runner = MockRunner::new();
        let mock = MockBackend::with_packages(["six"]);
        let client = Client::with_backend(mock.clone());
        let clone = client.clone();

        clone.uninstall(&runner, "six").unwrap();
        assert!(client.list_installed(&runner).unwrap().is_empty());
        assert_eq!(mock.uninstall_calls(), vec!["six"]);
    }
}
