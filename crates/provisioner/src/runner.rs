//! Plan runner - executes steps in order, skipping satisfied ones

use crate::context::{NoProgress, ProgressCallback, StepContext};
use crate::error::StepError;
use crate::plan::ProvisioningPlan;
use crate::step::Step;
use crate::types::{FailurePolicy, RunSummary, StepOutcome};

/// Run a plan to completion
///
/// For each step in declared order the precondition is evaluated first. A
/// satisfied step is reported as skipped; otherwise its effect runs (or,
/// in a dry run, is reported as `WouldApply`).
///
/// The first fatal failure stops the run and is returned as a
/// [`StepError`]. A failing precondition check is always fatal. A failing
/// effect is fatal unless the step's policy is [`FailurePolicy::Continue`],
/// in which case it is recorded in the summary and the run moves on.
pub fn run<P: ProgressCallback>(
    plan: ProvisioningPlan,
    ctx: &mut StepContext,
    progress: &mut P,
) -> Result<RunSummary, StepError> {
    let (plan_name, steps) = plan.into_parts();
    let mut summary = RunSummary::default();

    if steps.is_empty() {
        log::info!("Plan '{}' has no steps", plan_name);
        progress.on_empty_plan(&plan_name);
        return Ok(summary);
    }

    log::debug!("Running plan '{}' ({} steps)", plan_name, steps.len());
    progress.on_plan_start(&plan_name, steps.len());

    let total = steps.len();
    for (index, step) in steps.iter().enumerate() {
        let name = step.name();
        progress.on_step_start(index + 1, total, &name, &step.description());

        let outcome = match run_step(step.as_ref(), ctx) {
            Ok(outcome) => outcome,
            Err(err) => {
                progress.on_step_error(&name, &err.cause);
                return Err(err);
            }
        };

        summary.add_outcome(&name, &outcome);
        progress.on_step_complete(&name, &outcome);
    }

    progress.on_plan_complete(&plan_name, &summary);
    Ok(summary)
}

/// Run a plan without progress reporting
pub fn run_simple(plan: ProvisioningPlan, ctx: &mut StepContext) -> Result<RunSummary, StepError> {
    run(plan, ctx, &mut NoProgress)
}

fn run_step(step: &dyn Step, ctx: &mut StepContext) -> Result<StepOutcome, StepError> {
    let name = step.name();

    let satisfied = step
        .is_satisfied(ctx)
        .map_err(|e| StepError::new(&name, e))?;

    if satisfied {
        let reason = step.skip_reason();
        log::info!("Skipping {}: {}", name, reason);
        return Ok(StepOutcome::Skipped { reason });
    }

    if ctx.dry_run {
        log::info!("Would run {}", name);
        return Ok(StepOutcome::WouldApply);
    }

    log::debug!("Applying {} ({})", name, step.kind());
    match step.apply(ctx) {
        Ok(message) => {
            log::info!("{}: {}", name, message);
            Ok(StepOutcome::Performed { message })
        }
        Err(err) => match step.failure_policy() {
            FailurePolicy::Abort => Err(StepError::new(name, err)),
            FailurePolicy::Continue => {
                log::warn!("{} failed, continuing: {}", name, err);
                Ok(StepOutcome::Failed {
                    error: err.to_string(),
                })
            }
        },
    }
}
