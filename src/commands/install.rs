use anyhow::{Context as _, Result};
use provisioner::{RunOptions, StepContext};

use crate::Context;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::env_store::{self, ENV_FILE};
use crate::paths;
use crate::plans;
use crate::progress::ConsoleProgress;
use crate::system::SystemRunner;
use crate::ui;

pub fn run(ctx: &Context, args: RunArgs) -> Result<()> {
    let (config, _) = Config::load(ctx.config.as_deref())?;
    let settings = config.install.resolve()?;

    if !ctx.quiet {
        ui::kv("Source", &settings.url);
        ui::kv("Install directory", &settings.install_dir.display().to_string());
    }

    let state_dir = paths::state_dir()?;
    let mut env =
        env_store::user_store(&state_dir).context("Could not open the user environment")?;
    let runner = SystemRunner;
    let opts = RunOptions {
        dry_run: args.dry_run,
    };
    let mut step_ctx = StepContext::with_options(env.as_mut(), &runner, &opts);
    let mut progress = ConsoleProgress::new(ctx.quiet).with_verbose(ctx.verbose > 0);

    let plan = plans::install_plan(&settings, fetchkit::Client::new());
    let summary = provisioner::run(plan, &mut step_ctx, &mut progress).context("Install failed")?;

    if ctx.quiet {
        return Ok(());
    }
    println!();
    if args.dry_run {
        ui::info("Dry run: nothing was changed");
    } else if summary.performed > 0 {
        ui::success("Install complete");
        if !cfg!(windows) {
            ui::dim(&format!(
                "Source {} from your shell profile to pick up the {} change",
                state_dir.join(ENV_FILE).display(),
                settings.path_variable
            ));
        } else {
            ui::dim("Open a new terminal to pick up the PATH change");
        }
    }
    Ok(())
}
