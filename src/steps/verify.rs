use provisioner::{Result, Step, StepContext};
use std::path::{Path, PathBuf};

/// Run the installed tool once to prove it works
///
/// The PATH change is not visible to this process, so the program is run
/// from the bin directory when it exists there.
#[derive(Debug, Clone)]
pub struct VerifyInstall {
    pub program: String,
    pub args: Vec<String>,
    pub bin_dir: PathBuf,
}

impl VerifyInstall {
    pub fn new(program: impl Into<String>, args: Vec<String>, bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            bin_dir: bin_dir.into(),
        }
    }

    /// Full path inside the bin directory if present, else the bare name.
    pub fn resolve_program(&self) -> String {
        locate(&self.bin_dir, &self.program)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| self.program.clone())
    }
}

fn locate(dir: &Path, program: &str) -> Option<PathBuf> {
    let direct = dir.join(program);
    if direct.is_file() {
        return Some(direct);
    }
    if cfg!(windows) && Path::new(program).extension().is_none() {
        let exe = dir.join(format!("{program}.exe"));
        if exe.is_file() {
            return Some(exe);
        }
    }
    None
}

/// First non-empty line of stdout, else of stderr.
fn first_line(stdout: &str, stderr: &str) -> Option<String> {
    [stdout, stderr]
        .iter()
        .flat_map(|s| s.lines())
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

impl Step for VerifyInstall {
    fn name(&self) -> String {
        "verify-install".to_string()
    }

    fn description(&self) -> String {
        format!("Running {} {}", self.program, self.args.join(" "))
            .trim_end()
            .to_string()
    }

    fn kind(&self) -> &'static str {
        "verify"
    }

    fn apply(&self, ctx: &mut StepContext) -> Result<String> {
        let program = self.resolve_program();
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let output = ctx.runner().execute_checked(&program, &args)?;

        Ok(first_line(&output.stdout_str(), &output.stderr_str())
            .unwrap_or_else(|| format!("{} ran successfully", self.program)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_line_prefers_stdout() {
        assert_eq!(first_line("\n v1.0 \nmore", "err").as_deref(), Some("v1.0"));
        assert_eq!(
            first_line("", "pdftoppm version 24.08.0\nCopyright").as_deref(),
            Some("pdftoppm version 24.08.0")
        );
        assert_eq!(first_line(" \n", ""), None);
    }

    #[test]
    fn test_resolve_program_in_bin_dir() {
        let tmp = TempDir::new().unwrap();
        let name = if cfg!(windows) { "pdftoppm.exe" } else { "pdftoppm" };
        std::fs::write(tmp.path().join(name), b"").unwrap();

        let step = VerifyInstall::new("pdftoppm", vec!["-v".to_string()], tmp.path());
        assert_eq!(step.resolve_program(), tmp.path().join(name).display().to_string());
    }

    #[test]
    fn test_resolve_program_falls_back_to_name() {
        let tmp = TempDir::new().unwrap();
        let step = VerifyInstall::new("pdftoppm", Vec::new(), tmp.path().join("missing"));
        assert_eq!(step.resolve_program(), "pdftoppm");
        assert_eq!(step.description(), "Running pdftoppm");
    }
}
