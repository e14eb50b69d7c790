use provisioner::{FailurePolicy, Result, Step, StepContext};

/// Remove one package; a failure is recorded and the plan moves on
#[derive(Debug, Clone)]
pub struct UninstallPackage {
    pub package: String,
    client: pkgkit::Client,
}

impl UninstallPackage {
    pub fn new(package: impl Into<String>, client: pkgkit::Client) -> Self {
        Self {
            package: package.into(),
            client,
        }
    }
}

impl Step for UninstallPackage {
    fn name(&self) -> String {
        format!("uninstall:{}", self.package)
    }

    fn description(&self) -> String {
        format!("Removing {}", self.package)
    }

    fn kind(&self) -> &'static str {
        "uninstall"
    }

    fn apply(&self, ctx: &mut StepContext) -> Result<String> {
        self.client.uninstall(ctx.runner(), &self.package)?;
        Ok(format!("removed {}", self.package))
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Continue
    }
}
