//! Persistent user environment stores
//!
//! On Windows the user-scoped variables live in the registry and are read
//! and written through PowerShell. Elsewhere there is no equivalent, so the
//! values are kept in `<state_dir>/env.sh` as `export` lines for the user's
//! shell profile to source.

use provisioner::{CommandRunner, EnvironmentStore, Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::system::SystemRunner;

/// File name of the generated profile snippet
pub const ENV_FILE: &str = "env.sh";

const ENV_FILE_HEADER: &str = "# Managed by provision. Source this file from your shell profile.";

/// Redirected PowerShell output uses the OEM code page unless told otherwise.
const PS_UTF8_OUTPUT: &str = "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; ";

/// The platform's persistent store for user variables
pub fn user_store(state_dir: &Path) -> Result<Box<dyn EnvironmentStore>> {
    if cfg!(windows) {
        Ok(Box::new(UserEnvironment::new(SystemRunner)))
    } else {
        Ok(Box::new(EnvFileStore::open(state_dir.join(ENV_FILE))?))
    }
}

// ============================================================================
// Windows user environment
// ============================================================================

/// User-scoped variables via `[Environment]::Get/SetEnvironmentVariable`
#[derive(Debug)]
pub struct UserEnvironment<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> UserEnvironment<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn powershell(&self, name: &str, script: &str) -> Result<String> {
        let script = format!("{PS_UTF8_OUTPUT}{script}");
        let output = self
            .runner
            .execute_checked(
                "powershell",
                &["-NoProfile", "-NonInteractive", "-Command", &script],
            )
            .map_err(|e| Error::environment(name, e.to_string()))?;
        Ok(output.stdout_str())
    }
}

impl<R: CommandRunner> EnvironmentStore for UserEnvironment<R> {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let script = format!(
            "[Environment]::GetEnvironmentVariable({}, 'User')",
            ps_quote(name)
        );
        let value = self.powershell(name, &script)?;
        let value = value.trim_end_matches(['\r', '\n']);
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let script = format!(
            "[Environment]::SetEnvironmentVariable({}, {}, 'User')",
            ps_quote(name),
            ps_quote(value)
        );
        self.powershell(name, &script)?;
        Ok(())
    }
}

/// Single-quoted PowerShell literal (`'` doubled)
fn ps_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// ============================================================================
// Profile snippet store
// ============================================================================

/// `export NAME="value"` lines in a file
///
/// Variables not in the file fall back to the process environment, so the
/// first PATH update starts from the PATH the user already has.
#[derive(Debug)]
pub struct EnvFileStore {
    path: PathBuf,
    vars: BTreeMap<String, String>,
}

impl EnvFileStore {
    /// Load the file if it exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let vars = match fs::read_to_string(&path) {
            Ok(content) => parse_exports(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(Error::io(&path, e)),
        };
        log::debug!("Loaded {} variable(s) from {}", vars.len(), path.display());
        Ok(Self { path, vars })
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let mut content = String::from(ENV_FILE_HEADER);
        content.push('\n');
        for (name, value) in &self.vars {
            content.push_str(&format!("export {name}=\"{}\"\n", escape(value)));
        }
        fs::write(&self.path, content).map_err(|e| Error::io(&self.path, e))
    }
}

impl EnvironmentStore for EnvFileStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        if let Some(value) = self.vars.get(name) {
            return Ok(Some(value.clone()));
        }
        Ok(std::env::var(name).ok())
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.vars.insert(name.to_string(), value.to_string());
        self.save()
            .map_err(|e| Error::environment(name, e.to_string()))
    }
}

fn parse_exports(content: &str) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    for line in content.lines() {
        let Some(rest) = line.trim().strip_prefix("export ") else {
            continue;
        };
        let Some((name, raw)) = rest.split_once('=') else {
            continue;
        };
        let value = raw
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .map_or_else(|| raw.to_string(), unescape);
        vars.insert(name.trim().to_string(), value);
    }
    vars
}

/// Escape for a double-quoted shell string
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(next) = chars.next()
        {
            out.push(next);
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use provisioner::{CommandOutput, ErrorCategory, MockRunner};
    use tempfile::TempDir;

    #[test]
    fn test_env_file_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state").join(ENV_FILE);

        let mut store = EnvFileStore::open(&path).unwrap();
        store.set("PROVISION_TEST_PATH", "/usr/bin:/opt/$x \"q\"").unwrap();

        let reopened = EnvFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("PROVISION_TEST_PATH").unwrap().as_deref(),
            Some("/usr/bin:/opt/$x \"q\"")
        );

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(ENV_FILE_HEADER));
        assert!(content.contains("export PROVISION_TEST_PATH=\"/usr/bin:/opt/\\$x \\\"q\\\"\""));
    }

    #[test]
    fn test_env_file_falls_back_to_process_env() {
        let tmp = TempDir::new().unwrap();
        let store = EnvFileStore::open(tmp.path().join(ENV_FILE)).unwrap();

        // HOME or USERPROFILE is set in any test environment
        let name = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
        assert_eq!(store.get(name).unwrap(), std::env::var(name).ok());
        assert_eq!(store.get("PROVISION_SURELY_UNSET_VAR").unwrap(), None);
    }

    #[test]
    fn test_parse_exports_ignores_noise() {
        let vars = parse_exports("# comment\n\nexport A=\"1\"\nexport B=plain\nalias x=y\n");
        assert_eq!(vars.get("A").map(String::as_str), Some("1"));
        assert_eq!(vars.get("B").map(String::as_str), Some("plain"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_user_environment_get() {
        let runner = MockRunner::new();
        runner.respond(
            "powershell -NoProfile -NonInteractive -Command [Console]::OutputEncoding = [System.Text.Encoding]::UTF8; [Environment]::GetEnvironmentVariable('Path', 'User')",
            CommandOutput::ok("C:\\a;C:\\b\r\n"),
        );
        let env = UserEnvironment::new(runner);
        assert_eq!(env.get("Path").unwrap().as_deref(), Some("C:\\a;C:\\b"));
    }

    #[test]
    fn test_user_environment_reads_utf8() {
        let runner = MockRunner::new();
        runner.respond(
            "powershell -NoProfile -NonInteractive -Command [Console]::OutputEncoding = [System.Text.Encoding]::UTF8; [Environment]::GetEnvironmentVariable('Path', 'User')",
            CommandOutput::ok("C:\\Users\\José\\bin;C:\\b\r\n"),
        );
        let mut env = UserEnvironment::new(runner);

        let value = env.get("Path").unwrap().unwrap();
        assert_eq!(value, "C:\\Users\\José\\bin;C:\\b");
        env.set("Path", &value).unwrap();

        let calls = env.runner.calls();
        assert_eq!(calls.len(), 2);
        for call in &calls {
            assert!(call.contains(&format!("-Command {PS_UTF8_OUTPUT}[Environment]::")));
        }
        assert!(calls[1].contains("'C:\\Users\\José\\bin;C:\\b'"));
    }

    #[test]
    fn test_user_environment_unset_is_none() {
        let env = UserEnvironment::new(MockRunner::new());
        assert_eq!(env.get("Path").unwrap(), None);
    }

    #[test]
    fn test_user_environment_set_quotes_value() {
        let mut env = UserEnvironment::new(MockRunner::new());
        env.set("Path", "C:\\it's;C:\\poppler\\Library\\bin").unwrap();

        let calls = env.runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].ends_with(
            "[Environment]::SetEnvironmentVariable('Path', 'C:\\it''s;C:\\poppler\\Library\\bin', 'User')"
        ));
    }

    #[test]
    fn test_user_environment_failure_is_environment_error() {
        let runner = MockRunner::new();
        runner.missing_program("powershell");
        let mut env = UserEnvironment::new(runner);

        let err = env.set("Path", "x").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Environment);
    }
}
