//! Invocation configuration: one configure/build/verify cycle.

use indexmap::IndexMap;

/// How the built project is verified.
///
/// Selected once from the "run the test tool" and "memcheck" flags; every consumer dispatches with a
/// single exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verification {
    /// Run the fixture binary directly.
    #[default]
    DirectRun,
    /// Run the fixture binary under the memory checker.
    DirectRunWithMemcheck,
    /// Run the test tool.
    ToolRun,
    /// Run the test tool in memcheck mode.
    ToolRunWithMemcheck,
}

impl Verification {
    pub fn from_flags(run_test_tool: bool, memcheck: bool) -> Self {
        match (run_test_tool, memcheck) {
            (false, false) => Verification::DirectRun,
            (false, true) => Verification::DirectRunWithMemcheck,
            (true, false) => Verification::ToolRun,
            (true, true) => Verification::ToolRunWithMemcheck,
        }
    }

    pub fn runs_test_tool(self) -> bool {
        matches!(self, Verification::ToolRun | Verification::ToolRunWithMemcheck)
    }

    pub fn memcheck(self) -> bool {
        matches!(
            self,
            Verification::DirectRunWithMemcheck | Verification::ToolRunWithMemcheck
        )
    }

    /// Same mode with memcheck switched on.
    pub fn with_memcheck(self) -> Self {
        Self::from_flags(self.runs_test_tool(), true)
    }
}

/// Immutable description of one cycle. Build with [`InvocationConfig::builder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationConfig {
    preset: Option<String>,
    build_preset: Option<String>,
    variables: IndexMap<String, String>,
    verification: Verification,
}

impl InvocationConfig {
    pub fn builder() -> InvocationBuilder {
        InvocationBuilder::default()
    }

    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }

    pub fn build_preset(&self) -> Option<&str> {
        self.build_preset.as_deref()
    }

    /// Override variables in insertion order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn variable(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn verification(&self) -> Verification {
        self.verification
    }
}

/// Builder for [`InvocationConfig`].
#[derive(Debug, Clone, Default)]
pub struct InvocationBuilder {
    config: InvocationConfig,
}

impl InvocationBuilder {
    /// Configure preset (`--preset <name>`).
    pub fn preset(mut self, name: impl Into<String>) -> Self {
        self.config.preset = Some(name.into());
        self
    }

    /// Build preset (`cmake --build . --preset <name>`).
    pub fn build_preset(mut self, name: impl Into<String>) -> Self {
        self.config.build_preset = Some(name.into());
        self
    }

    pub fn maybe_preset(mut self, name: Option<String>) -> Self {
        self.config.preset = name;
        self
    }

    pub fn maybe_build_preset(mut self, name: Option<String>) -> Self {
        self.config.build_preset = name;
        self
    }

    /// Add an override. Re-adding a key replaces its value and keeps its original position.
    pub fn variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.variables.insert(key.into(), value.into());
        self
    }

    pub fn variables<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            self.config.variables.insert(key.into(), value.into());
        }
        self
    }

    pub fn verification(mut self, verification: Verification) -> Self {
        self.config.verification = verification;
        self
    }

    /// Shorthand for [`Verification::from_flags`].
    pub fn flags(self, run_test_tool: bool, memcheck: bool) -> Self {
        self.verification(Verification::from_flags(run_test_tool, memcheck))
    }

    pub fn build(self) -> InvocationConfig {
        self.config
    }
}
