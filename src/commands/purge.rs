use anyhow::{Context as _, Result, bail};
use provisioner::{MemoryEnvironment, ProgressCallback, RunOptions, StepContext};

use crate::Context;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::plans;
use crate::progress::{self, ConsoleProgress};
use crate::system::SystemRunner;
use crate::ui;

pub fn run(ctx: &Context, args: RunArgs) -> Result<()> {
    let (config, _) = Config::load(ctx.config.as_deref())?;
    let purge = config.purge;

    let packages = pkgkit::Client::pip(purge.command.clone())
        .context("Invalid [purge].command")?;
    let runner = SystemRunner;
    let mut reporter = ConsoleProgress::new(ctx.quiet).with_verbose(ctx.verbose > 0);

    let pb = (!ctx.quiet).then(|| progress::spinner("Listing installed packages..."));
    let listed = plans::purge_plan(&purge, &packages, &runner);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let plan = match listed {
        Ok(plan) => plan,
        Err(err) => {
            reporter.on_step_error(&err.step, &err.cause);
            return Err(err).context("Purge failed");
        }
    };

    if plan.is_empty() {
        if !ctx.quiet {
            ui::info(&format!("Nothing to uninstall (only {} is installed)", purge.exempt));
        }
        return Ok(());
    }

    // Purge steps never read or write environment variables.
    let mut env = MemoryEnvironment::new();
    let opts = RunOptions {
        dry_run: args.dry_run,
    };
    let mut step_ctx = StepContext::with_options(&mut env, &runner, &opts);
    let summary = provisioner::run(plan, &mut step_ctx, &mut reporter).context("Purge failed")?;

    if !summary.is_success() {
        println!();
        ui::warn("Some packages were not removed:");
        for failure in &summary.failures {
            ui::error(&format!("{}: {}", failure.step, failure.error));
        }
        bail!(
            "{} package(s) could not be uninstalled",
            summary.failures.len()
        );
    }

    if !ctx.quiet {
        println!();
        if args.dry_run {
            ui::info("Dry run: nothing was uninstalled");
        } else {
            ui::success(&format!(
                "Removed {} package(s); {} kept",
                summary.performed, purge.exempt
            ));
        }
    }
    Ok(())
}
