//! Core types for package listings.

use serde::{Deserialize, Serialize};

/// An installed package as reported by the manager.
///
/// Deserializes directly from one entry of `pip list --format=json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Package name as the manager prints it
    pub name: String,
    /// Installed version
    #[serde(default)]
    pub version: String,
}

impl InstalledPackage {
    /// Create a package entry.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Whether this package is `name` once both are normalized.
    pub fn is(&self, name: &str) -> bool {
        same_package(&self.name, name)
    }
}

/// Normalize a package name for comparison.
///
/// Lowercases and collapses every run of `-`, `_` and `.` into a single `-`,
/// so `Typing_Extensions`, `typing.extensions` and `typing-extensions` are
/// the same package.
///
/// ```
/// assert_eq!(pkgkit::normalize_name("Typing_Extensions"), "typing-extensions");
/// assert_eq!(pkgkit::normalize_name("zope..interface"), "zope-interface");
/// ```
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// Compare two package names after normalization.
pub fn same_package(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("pip"), "pip");
        assert_eq!(normalize_name("PyYAML"), "pyyaml");
        assert_eq!(normalize_name("ruamel.yaml.clib"), "ruamel-yaml-clib");
        assert_eq!(normalize_name("a_-_b"), "a-b");
        assert_eq!(normalize_name("  Pip "), "pip");
    }

    #[test]
    fn test_same_package() {
        assert!(same_package("Pip", "pip"));
        assert!(same_package("typing_extensions", "typing-extensions"));
        assert!(!same_package("pip", "pipx"));
    }

    #[test]
    fn test_deserialize_pip_entry() {
        let pkg: InstalledPackage =
            serde_json::from_str(r#"{"name": "requests", "version": "2.32.3"}"#).unwrap();
        assert_eq!(pkg, InstalledPackage::new("requests", "2.32.3"));
        assert!(pkg.is("Requests"));
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let pkg: InstalledPackage = serde_json::from_str(
            r#"{"name": "mypkg", "version": "0.1", "editable_project_location": "/src"}"#,
        )
        .unwrap();
        assert_eq!(pkg.name, "mypkg");
    }
}
