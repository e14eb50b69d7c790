use provisioner::{Result, Step, StepContext, pathvar};

/// Append a directory to a PATH-like user variable
///
/// The presence check is a substring match against the whole value, so
/// `C:\poppler\bin` counts as present inside `C:\poppler\bin2`.
#[derive(Debug, Clone)]
pub struct AddToPath {
    pub variable: String,
    pub segment: String,
    pub separator: char,
}

impl AddToPath {
    pub fn new(variable: impl Into<String>, segment: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            segment: segment.into(),
            separator: pathvar::SEPARATOR,
        }
    }
}

impl Step for AddToPath {
    fn name(&self) -> String {
        "add-to-path".to_string()
    }

    fn description(&self) -> String {
        format!("Adding {} to {}", self.segment, self.variable)
    }

    fn kind(&self) -> &'static str {
        "environment"
    }

    fn is_satisfied(&self, ctx: &StepContext) -> Result<bool> {
        let current = ctx.env().get(&self.variable)?.unwrap_or_default();
        Ok(pathvar::contains_segment(&current, &self.segment))
    }

    fn skip_reason(&self) -> String {
        format!("{} already on {}", self.segment, self.variable)
    }

    fn apply(&self, ctx: &mut StepContext) -> Result<String> {
        let current = ctx.env().get(&self.variable)?.unwrap_or_default();
        let updated = pathvar::append_segment(&current, &self.segment, self.separator);
        ctx.env_mut().set(&self.variable, &updated)?;
        Ok(format!("appended {} to {}", self.segment, self.variable))
    }
}
