//! Backend abstraction for package managers.
//!
//! The [`Backend`] trait defines the interface for listing and removing
//! packages. Backends never spawn processes themselves; every invocation
//! goes through the [`CommandRunner`] passed in, so the caller decides
//! whether commands really run.

pub mod pip;

use crate::error::{Error, Result};
use crate::types::InstalledPackage;
use provisioner::CommandRunner;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Backend trait for package manager operations.
pub trait Backend: Send + Sync {
    /// Short name for messages (e.g. `pip`).
    fn name(&self) -> &str;

    /// List all installed packages, in the manager's order.
    fn list_installed(&self, runner: &dyn CommandRunner) -> Result<Vec<InstalledPackage>>;

    /// Uninstall a package by name without prompting.
    fn uninstall(&self, runner: &dyn CommandRunner, name: &str) -> Result<()>;
}

/// In-memory backend for tests.
///
/// Holds a package list; `uninstall` removes from it. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    packages: Arc<Mutex<Vec<InstalledPackage>>>,
    failing: Arc<Mutex<Vec<String>>>,
    uninstalled: Arc<Mutex<Vec<String>>>,
    list_error: Arc<Mutex<Option<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with the given packages installed.
    pub fn with_packages<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        for name in names {
            mock.add_package(name, "1.0");
        }
        mock
    }

    /// Mark a package as installed.
    pub fn add_package(&self, name: impl Into<String>, version: impl Into<String>) {
        lock(&self.packages).push(InstalledPackage::new(name, version));
    }

    /// Make uninstalling `name` fail.
    pub fn fail_uninstall(&self, name: impl Into<String>) {
        lock(&self.failing).push(name.into());
    }

    /// Make listing fail with `stderr`.
    pub fn fail_list(&self, stderr: impl Into<String>) {
        *lock(&self.list_error) = Some(stderr.into());
    }

    /// Names currently installed.
    pub fn installed_names(&self) -> Vec<String> {
        lock(&self.packages).iter().map(|p| p.name.clone()).collect()
    }

    /// Names passed to `uninstall`, in order.
    pub fn uninstall_calls(&self) -> Vec<String> {
        lock(&self.uninstalled).clone()
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn list_installed(&self, _runner: &dyn CommandRunner) -> Result<Vec<InstalledPackage>> {
        if let Some(stderr) = lock(&self.list_error).clone() {
            return Err(Error::CommandFailed {
                command: "mock list".to_string(),
                code: Some(1),
                stderr,
            });
        }
        Ok(lock(&self.packages).clone())
    }

    fn uninstall(&self, _runner: &dyn CommandRunner, name: &str) -> Result<()> {
        lock(&self.uninstalled).push(name.to_string());

        if lock(&self.failing).iter().any(|f| f == name) {
            return Err(Error::CommandFailed {
                command: format!("mock uninstall {name}"),
                code: Some(1),
                stderr: format!("cannot remove {name}"),
            });
        }

        let mut packages = lock(&self.packages);
        let before = packages.len();
        packages.retain(|p| !p.is(name));
        if packages.len() == before {
            return Err(Error::NotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}
