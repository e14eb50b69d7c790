use provisioner::{Error, Result, Step, StepContext};
use std::fs;
use std::path::PathBuf;

/// Create the install directory (and parents)
#[derive(Debug, Clone)]
pub struct CreateInstallDir {
    pub path: PathBuf,
}

impl CreateInstallDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Step for CreateInstallDir {
    fn name(&self) -> String {
        "create-install-dir".to_string()
    }

    fn description(&self) -> String {
        format!("Creating {}", self.path.display())
    }

    fn kind(&self) -> &'static str {
        "directory"
    }

    fn is_satisfied(&self, _ctx: &StepContext) -> Result<bool> {
        Ok(self.path.is_dir())
    }

    fn skip_reason(&self) -> String {
        format!("{} already exists", self.path.display())
    }

    fn apply(&self, _ctx: &mut StepContext) -> Result<String> {
        fs::create_dir_all(&self.path).map_err(|e| Error::io(&self.path, e))?;
        Ok(format!("created {}", self.path.display()))
    }
}
