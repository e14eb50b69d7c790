//! # Provisioner
//!
//! An idempotent provisioning runner.
//!
//! A plan is an ordered list of guarded steps. Each step first checks
//! whether its desired end state already holds and skips itself if so;
//! otherwise it performs its effect and reports a completion message.
//! Running the same plan twice has the same net effect as running it once.
//!
//! ## Core Concepts
//!
//! - **Step**: a precondition plus an effect ([`Step`], [`FnStep`])
//! - **ProvisioningPlan**: steps in execution order, no branching, no rollback
//! - **run**: executes the plan, aborting on the first fatal [`StepError`]
//! - **Capabilities**: [`EnvironmentStore`] and [`CommandRunner`] are
//!   injected through [`StepContext`] instead of touching process globals
//!
//! ## Example
//!
//! ```
//! use provisioner::{
//!     EnvironmentStore, FnStep, MemoryEnvironment, MockRunner, ProvisioningPlan,
//!     StepContext, pathvar, run_simple,
//! };
//!
//! let mut plan = ProvisioningPlan::new("path");
//! plan.push(
//!     FnStep::new("add-to-path", |ctx| {
//!         let current = ctx.env().get("PATH")?.unwrap_or_default();
//!         let updated = pathvar::append_segment(&current, "/opt/tool/bin", ':');
//!         ctx.env_mut().set("PATH", &updated)
//!     })
//!     .when_missing(|ctx| {
//!         let current = ctx.env().get("PATH")?.unwrap_or_default();
//!         Ok(pathvar::contains_segment(&current, "/opt/tool/bin"))
//!     }),
//! );
//!
//! let mut env = MemoryEnvironment::with_var("PATH", "/usr/bin");
//! let runner = MockRunner::new();
//! let mut ctx = StepContext::new(&mut env, &runner);
//! let summary = run_simple(plan, &mut ctx).unwrap();
//! assert_eq!(summary.performed, 1);
//! ```
//!
//! ## Provider Traits
//!
//! - [`EnvironmentStore`]: reads and writes PATH-like variables
//! - [`CommandRunner`]: invokes external programs
//! - [`ProgressCallback`]: receives per-step notices
//!
//! [`MemoryEnvironment`] and [`MockRunner`] are in-memory fakes of the
//! first two.

pub mod context;
pub mod error;
pub mod pathvar;
pub mod plan;
pub mod runner;
pub mod step;
pub mod types;

// Re-export main types at crate root
pub use context::{
    CommandRunner, EnvironmentStore, MemoryEnvironment, MockRunner, NoProgress, ProgressCallback,
    StepContext, command_line,
};
pub use error::{Error, ErrorCategory, Result, StepError};
pub use plan::ProvisioningPlan;
pub use runner::{run, run_simple};
pub use step::{BoxedStep, FnStep, Step};
pub use types::{CommandOutput, FailurePolicy, RunOptions, RunSummary, StepFailure, StepOutcome};
