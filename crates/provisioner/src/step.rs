//! Step trait for idempotent provisioning
//!
//! A step pairs a precondition ("is the end state already here?") with an
//! effect that produces that end state. The runner only calls `apply` when
//! `is_satisfied` returns false.

use crate::context::StepContext;
use crate::error::Result;
use crate::types::FailurePolicy;
use std::fmt;

/// Core trait for provisioning steps
///
/// # Example
///
/// ```
/// use provisioner::{Step, StepContext, Result};
/// use std::path::PathBuf;
///
/// #[derive(Debug)]
/// struct EnsureDir {
///     path: PathBuf,
/// }
///
/// impl Step for EnsureDir {
///     fn name(&self) -> String {
///         "create-dir".to_string()
///     }
///
///     fn description(&self) -> String {
///         format!("Create {}", self.path.display())
///     }
///
///     fn kind(&self) -> &'static str {
///         "directory"
///     }
///
///     fn is_satisfied(&self, _ctx: &StepContext) -> Result<bool> {
///         Ok(self.path.is_dir())
///     }
///
///     fn apply(&self, _ctx: &mut StepContext) -> Result<String> {
///         std::fs::create_dir_all(&self.path)
///             .map_err(|e| provisioner::Error::io(&self.path, e))?;
///         Ok(format!("Created {}", self.path.display()))
///     }
/// }
/// ```
pub trait Step: fmt::Debug {
    /// Stable identifier used in notices and errors (e.g. "download-archive")
    fn name(&self) -> String;

    /// Human-readable description of the effect
    fn description(&self) -> String;

    /// Step category, e.g. "download", "directory", "uninstall"
    fn kind(&self) -> &'static str;

    /// Whether the desired end state already holds
    ///
    /// The default treats the step as unconditional: its effect runs on
    /// every run.
    fn is_satisfied(&self, _ctx: &StepContext) -> Result<bool> {
        Ok(false)
    }

    /// Message used for the "skip" notice when the precondition holds
    fn skip_reason(&self) -> String {
        "already done".to_string()
    }

    /// Perform the effect and return the completion message
    fn apply(&self, ctx: &mut StepContext) -> Result<String>;

    /// What the runner does when `apply` fails
    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Abort
    }
}

/// A boxed step for type-erased storage
pub type BoxedStep = Box<dyn Step>;

type Precondition = Box<dyn Fn(&StepContext) -> Result<bool>>;
type Effect = Box<dyn Fn(&mut StepContext) -> Result<()>>;

/// A step assembled from closures
///
/// Mirrors the plain data shape of a step: a name, a precondition, an
/// effect and a completion message.
///
/// ```
/// use provisioner::{FnStep, MemoryEnvironment, MockRunner, ProvisioningPlan, StepContext, run_simple};
///
/// let mut plan = ProvisioningPlan::new("demo");
/// plan.push(
///     FnStep::new("greet", |_ctx| Ok(()))
///         .when_missing(|_ctx| Ok(false))
///         .message("said hello"),
/// );
///
/// let mut env = MemoryEnvironment::new();
/// let runner = MockRunner::new();
/// let mut ctx = StepContext::new(&mut env, &runner);
/// let summary = run_simple(plan, &mut ctx).unwrap();
/// assert_eq!(summary.performed, 1);
/// ```
pub struct FnStep {
    name: String,
    description: String,
    precondition: Option<Precondition>,
    effect: Effect,
    message: String,
    policy: FailurePolicy,
}

impl FnStep {
    /// Create an unconditional step running `effect`
    pub fn new(
        name: impl Into<String>,
        effect: impl Fn(&mut StepContext) -> Result<()> + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            message: format!("{name} done"),
            name,
            precondition: None,
            effect: Box::new(effect),
            policy: FailurePolicy::Abort,
        }
    }

    /// Guard the effect: it only runs while `satisfied` returns false
    pub fn when_missing(
        mut self,
        satisfied: impl Fn(&StepContext) -> Result<bool> + 'static,
    ) -> Self {
        self.precondition = Some(Box::new(satisfied));
        self
    }

    /// Set the completion message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the failure policy
    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl fmt::Debug for FnStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep")
            .field("name", &self.name)
            .field("guarded", &self.precondition.is_some())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Step for FnStep {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn kind(&self) -> &'static str {
        "fn"
    }

    fn is_satisfied(&self, ctx: &StepContext) -> Result<bool> {
        match &self.precondition {
            Some(check) => check(ctx),
            None => Ok(false),
        }
    }

    fn apply(&self, ctx: &mut StepContext) -> Result<String> {
        (self.effect)(ctx)?;
        Ok(self.message.clone())
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }
}
