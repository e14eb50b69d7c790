//! The two provisioning plans
//!
//! `install`: download-archive, create-install-dir, extract-archive,
//! add-to-path, verify-install.
//!
//! `purge`: one `uninstall:<name>` step per installed package except the
//! exempt one. The package list is read when the plan is built, so the
//! plan itself is a fixed list like any other.

use provisioner::{CommandRunner, ProvisioningPlan, StepError};

use crate::config::{InstallSettings, PurgeConfig};
use crate::steps::{
    AddToPath, CreateInstallDir, DownloadArchive, ExtractArchive, UninstallPackage, VerifyInstall,
};

/// Name of the pseudo-step reported when listing packages fails
pub const LIST_PACKAGES: &str = "list-packages";

pub fn install_plan(settings: &InstallSettings, fetch: fetchkit::Client) -> ProvisioningPlan {
    ProvisioningPlan::new("install")
        .with_step(DownloadArchive::new(&settings.url, &settings.archive, fetch))
        .with_step(CreateInstallDir::new(&settings.install_dir))
        .with_step(ExtractArchive::new(
            &settings.archive,
            &settings.install_dir,
            settings.strip_components,
        ))
        .with_step(AddToPath::new(
            &settings.path_variable,
            settings.bin_dir.display().to_string(),
        ))
        .with_step(VerifyInstall::new(
            &settings.verify_program,
            settings.verify_args.clone(),
            &settings.bin_dir,
        ))
}

/// Build the purge plan, listing installed packages through `runner`.
pub fn purge_plan(
    settings: &PurgeConfig,
    packages: &pkgkit::Client,
    runner: &dyn CommandRunner,
) -> Result<ProvisioningPlan, StepError> {
    let candidates = packages
        .purge_candidates(runner, &settings.exempt)
        .map_err(|e| StepError::new(LIST_PACKAGES, e.into()))?;

    let mut plan = ProvisioningPlan::new("purge");
    for pkg in candidates {
        plan.push(UninstallPackage::new(pkg.name, packages.clone()));
    }
    Ok(plan)
}
