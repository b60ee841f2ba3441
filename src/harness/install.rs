//! Dependency installer (Conan).

use toolbelt_core::tools::{self, ToolId};

use super::config::HarnessConfig;
use super::process::{ToolInvocation, ToolRunner, run_checked};
use super::stage::Workspace;
use super::HarnessResult;

/// The two Conan invocations for `workspace`, in the order they run.
pub fn install_invocations(config: &HarnessConfig, workspace: &Workspace) -> [ToolInvocation; 2] {
    let conan = |args: &[&str]| {
        ToolInvocation::new(ToolId::Conan, config.program(ToolId::Conan), workspace.root())
            .args(args.iter().copied())
            .env(tools::CONAN_HOME_ENV, workspace.cache_home().as_os_str())
    };
    [
        conan(tools::CONAN_PROFILE_DETECT_ARGS),
        conan(tools::CONAN_INSTALL_ARGS),
    ]
}

/// Detect a default profile and install the project's packages, building any that are missing.
///
/// `CONAN_HOME` points at the workspace's own cache, so installs never touch the user's cache or each
/// other. Returns the workspace for chaining.
#[tracing::instrument(skip_all, fields(fixture = workspace.fixture()))]
pub fn install_dependencies<'w>(
    runner: &dyn ToolRunner,
    config: &HarnessConfig,
    workspace: &'w Workspace,
) -> HarnessResult<&'w Workspace> {
    for invocation in install_invocations(config, workspace) {
        run_checked(runner, &invocation)?;
    }
    Ok(workspace)
}
