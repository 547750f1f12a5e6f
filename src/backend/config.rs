//! Generator configuration.

/// What to do when a command's guard does not imply the guard of a type it references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CondMismatchPolicy {
    /// Log a warning and emit anyway.
    #[default]
    Warn,
    /// Abort generation.
    Deny,
}

/// Settings shared by every unit of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Prepended to every generated unit basename (e.g. `"utm-"`).
    pub prefix: String,
    pub cond_mismatch: CondMismatchPolicy,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_cond_mismatch(mut self, policy: CondMismatchPolicy) -> Self {
        self.cond_mismatch = policy;
        self
    }
}
