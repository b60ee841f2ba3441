//! Error types for harness operations.
//!
//! Every failure surfaces to the caller unchanged: nothing in the harness retries or recovers. Tool
//! failures are also how expected-failure scenarios are recognised, see
//! [`expect_failure`](super::assertions::expect_failure).

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use toolbelt_core::tools::ToolId;

/// Result type for harness operations.
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

/// Errors that can occur while staging, configuring, building or verifying a fixture.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// The fixture name does not resolve to a template directory.
    #[error("unknown fixture '{name}': no template directory at {}", .path.display())]
    #[diagnostic(code(toolbelt::unknown_fixture), help("run `toolbelt fixtures` to list known fixtures"))]
    UnknownFixture { name: String, path: PathBuf },

    /// A configured shared helper directory is missing.
    #[error("shared helper directory not found: {}", .0.display())]
    #[diagnostic(code(toolbelt::missing_shared_dir), help("check `shared` in toolbelt.toml"))]
    MissingSharedDir(PathBuf),

    /// The tool could not be started at all.
    #[error("failed to start {tool} ({program}): {source}")]
    #[diagnostic(code(toolbelt::spawn), help("is the tool installed and on PATH?"))]
    Spawn {
        tool: ToolId,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited non-zero.
    #[error("{tool} failed ({}): {command}", exit_status(.code))]
    #[diagnostic(code(toolbelt::tool_failed))]
    ToolFailed {
        tool: ToolId,
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// Captured output did not satisfy the assertion set.
    #[error(transparent)]
    #[diagnostic(code(toolbelt::assertion))]
    Assertion(#[from] AssertionFailure),

    /// The compiled binary is not where the build should have put it.
    #[error("test binary not found: {}", .0.display())]
    #[diagnostic(code(toolbelt::binary_not_found), help("check `binary` in toolbelt.toml and the build preset"))]
    BinaryNotFound(PathBuf),

    /// A scenario marked as failing completed successfully.
    #[error("expected a tool failure, but every phase succeeded")]
    #[diagnostic(code(toolbelt::unexpected_success))]
    UnexpectedSuccess,

    /// Filesystem operation failed.
    #[error("{context}: {source}")]
    #[diagnostic(code(toolbelt::io))]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a TOML configuration or manifest.
    #[error("failed to parse {}: {source}", .path.display())]
    #[diagnostic(code(toolbelt::parse_toml))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration is syntactically valid but unusable.
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(toolbelt::config))]
    Config(String),
}

impl HarnessError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        HarnessError::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the fixture itself misbehaved (a tool failed, output was wrong, the binary was missing, or an
    /// expected failure did not happen), as opposed to the harness being unable to run it.
    pub fn is_scenario_failure(&self) -> bool {
        matches!(
            self,
            HarnessError::ToolFailed { .. }
                | HarnessError::Assertion(_)
                | HarnessError::BinaryNotFound(_)
                | HarnessError::UnexpectedSuccess
        )
    }

    /// Whether this is a non-zero exit of an external tool.
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, HarnessError::ToolFailed { .. })
    }

    /// Captured tool output, when the error carries any.
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            HarnessError::ToolFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Why an assertion over captured output failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionFailure {
    #[error("expected output to contain {0:?}")]
    Missing(String),

    #[error("expected output not to contain {0:?}")]
    Unexpected(String),

    #[error("output lines differ\n  expected: {expected:?}\n  actual:   {actual:?}")]
    LinesMismatch { expected: Vec<String>, actual: Vec<String> },
}
