//! External process boundary.
//!
//! Every tool the harness drives is launched through the [`ToolRunner`] trait. The default
//! [`SystemRunner`] spawns real processes and blocks until they exit; tests substitute a runner that
//! records invocations and replays scripted outputs.
//!
//! Runners only report what happened. Turning a non-zero exit into an error is done once, in
//! [`run_checked`], so every phase fails the same way.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use toolbelt_core::tools::ToolId;

use super::{HarnessError, HarnessResult};

/// One fully assembled command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Which tool this is, for diagnostics.
    pub tool: ToolId,
    /// Executable name or path.
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Directory the process runs in.
    pub cwd: PathBuf,
    /// Extra environment for the child only; the harness never mutates its own environment.
    pub env: Vec<(String, OsString)>,
}

impl ToolInvocation {
    pub fn new(tool: ToolId, program: impl Into<PathBuf>, cwd: &Path) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Render as a single shell-like line (for logs and error messages).
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// What a finished process produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Standard output followed by standard error.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        if self.stdout.is_empty() {
            return self.stderr.clone();
        }
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        text.push_str(&self.stdout);
        if !self.stdout.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text
    }
}

/// Launch external processes.
///
/// Implementations block until the process exits. There is no timeout: a hung tool hangs the harness.
pub trait ToolRunner {
    /// Run the invocation and report its output. Only failures to start the process are errors.
    fn run(&self, invocation: &ToolInvocation) -> HarnessResult<ToolOutput>;
}

/// Spawns real processes (the default runner).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> HarnessResult<ToolOutput> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).current_dir(&invocation.cwd);
        for (key, value) in &invocation.env {
            command.env(key, value);
        }

        let output = command.output().map_err(|source| HarnessError::Spawn {
            tool: invocation.tool,
            program: invocation.program.display().to_string(),
            source,
        })?;

        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Run an invocation and turn a non-zero exit into [`HarnessError::ToolFailed`].
pub fn run_checked(runner: &dyn ToolRunner, invocation: &ToolInvocation) -> HarnessResult<ToolOutput> {
    let command = invocation.command_line();
    tracing::debug!(tool = %invocation.tool, cwd = %invocation.cwd.display(), "running {}", command);

    let output = runner.run(invocation)?;
    if output.success {
        return Ok(output);
    }

    tracing::debug!(tool = %invocation.tool, code = ?output.code, "tool exited unsuccessfully");
    Err(HarnessError::ToolFailed {
        tool: invocation.tool,
        command,
        code: output.code,
        output: output.combined(),
    })
}
