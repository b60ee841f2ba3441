//! Configuration and build runners.

use toolbelt_core::tools::{self, ToolId};

use super::assertions::{CapturedOutput, Phase};
use super::config::HarnessConfig;
use super::invocation::InvocationConfig;
use super::process::{ToolInvocation, ToolRunner, run_checked};
use super::stage::Workspace;
use super::HarnessResult;

/// `cmake . [--preset <name>] [-D<key>=<value>...]`
pub fn configure_invocation(
    config: &HarnessConfig,
    workspace: &Workspace,
    invocation: &InvocationConfig,
) -> ToolInvocation {
    let mut cmd = ToolInvocation::new(ToolId::Cmake, config.program(ToolId::Cmake), workspace.root())
        .arg(tools::PROJECT_DIR_ARG);
    if let Some(preset) = invocation.preset() {
        cmd = cmd.args([tools::PRESET_FLAG, preset]);
    }
    cmd.args(invocation.variables().map(|(key, value)| tools::define_flag(key, value)))
}

/// `cmake --build . [--preset <name>]`
pub fn build_invocation(config: &HarnessConfig, workspace: &Workspace, invocation: &InvocationConfig) -> ToolInvocation {
    let mut cmd = ToolInvocation::new(ToolId::Cmake, config.program(ToolId::Cmake), workspace.root())
        .args([tools::BUILD_FLAG, tools::PROJECT_DIR_ARG]);
    if let Some(preset) = invocation.build_preset() {
        cmd = cmd.args([tools::PRESET_FLAG, preset]);
    }
    cmd
}

/// Configure the staged project and capture everything the configuration scripts printed.
#[tracing::instrument(skip_all, fields(fixture = workspace.fixture(), preset = invocation.preset()))]
pub fn configure(
    runner: &dyn ToolRunner,
    config: &HarnessConfig,
    workspace: &Workspace,
    invocation: &InvocationConfig,
) -> HarnessResult<CapturedOutput> {
    let output = run_checked(runner, &configure_invocation(config, workspace, invocation))?;
    Ok(CapturedOutput::new(Phase::Configure, output.combined()))
}

/// Build the configured project. Build output is discarded so it cannot leak into later assertions.
#[tracing::instrument(skip_all, fields(fixture = workspace.fixture(), preset = invocation.build_preset()))]
pub fn build(
    runner: &dyn ToolRunner,
    config: &HarnessConfig,
    workspace: &Workspace,
    invocation: &InvocationConfig,
) -> HarnessResult<()> {
    let _drained = run_checked(runner, &build_invocation(config, workspace, invocation))?;
    Ok(())
}
