//! Provisioning plan - an ordered list of steps

use crate::step::{BoxedStep, Step};

/// An ordered sequence of steps, executed top to bottom
///
/// There is no branching and no rollback. A plan is built once and consumed
/// by [`run`](crate::runner::run).
#[derive(Debug)]
pub struct ProvisioningPlan {
    name: String,
    steps: Vec<BoxedStep>,
}

impl ProvisioningPlan {
    /// Create a new empty plan
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step
    pub fn push(&mut self, step: impl Step + 'static) {
        self.steps.push(Box::new(step));
    }

    /// Append an already boxed step
    pub fn push_boxed(&mut self, step: BoxedStep) {
        self.steps.push(step);
    }

    /// Builder-style append
    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.push(step);
        self
    }

    /// Plan name, used in notices
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, Vec<BoxedStep>) {
        (self.name, self.steps)
    }
}
