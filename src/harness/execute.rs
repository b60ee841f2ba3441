//! Execution/verification runner.
//!
//! After a successful build the project is verified either by running its binary or by running the test
//! tool, optionally under the memory checker. See [`Verification`].

use std::path::{Path, PathBuf};

use toolbelt_core::memcheck;
use toolbelt_core::tools::{self, ToolId};
use toolbelt_core::Platform;

use super::assertions::{CapturedOutput, Phase};
use super::config::HarnessConfig;
use super::invocation::{InvocationConfig, Verification};
use super::process::{ToolInvocation, ToolRunner, run_checked};
use super::stage::Workspace;
use super::{HarnessError, HarnessResult};

/// Where the build is expected to have put binary `name`.
///
/// On platforms with configuration-named output directories the `Release` build wins when present,
/// otherwise the `Debug` path is returned (whether or not it exists). Elsewhere the binary sits directly in
/// `root` and the configuration directories are never consulted.
pub fn resolve_binary(platform: Platform, root: &Path, name: &str) -> PathBuf {
    if !platform.uses_config_subdirs() {
        return root.join(name);
    }

    let file_name = format!("{}{}", name, platform.exe_suffix());
    let release = root.join(tools::RELEASE_DIR).join(&file_name);
    if release.exists() {
        release
    } else {
        root.join(tools::DEBUG_DIR).join(file_name)
    }
}

/// Assemble the verify-phase command for `invocation`'s [`Verification`] mode.
pub fn verify_invocation(
    config: &HarnessConfig,
    workspace: &Workspace,
    invocation: &InvocationConfig,
    platform: Platform,
) -> ToolInvocation {
    let root = workspace.root();
    let ctest = || ToolInvocation::new(ToolId::Ctest, config.program(ToolId::Ctest), root);
    let binary = || resolve_binary(platform, root, &config.binary);

    match invocation.verification() {
        Verification::ToolRun => ctest(),
        Verification::ToolRunWithMemcheck => ctest().args(memcheck::ctest_memcheck_args()),
        Verification::DirectRun => ToolInvocation::new(ToolId::Binary, binary(), root),
        Verification::DirectRunWithMemcheck => {
            ToolInvocation::new(ToolId::Valgrind, config.program(ToolId::Valgrind), root)
                .args(memcheck::MEMCHECK_OPTIONS.iter().copied())
                .arg(binary().display().to_string())
        }
    }
}

/// Verify the built project and capture what it printed.
#[tracing::instrument(skip_all, fields(fixture = workspace.fixture(), mode = ?invocation.verification()))]
pub fn verify(
    runner: &dyn ToolRunner,
    config: &HarnessConfig,
    workspace: &Workspace,
    invocation: &InvocationConfig,
    platform: Platform,
) -> HarnessResult<CapturedOutput> {
    if !invocation.verification().runs_test_tool() {
        let binary = resolve_binary(platform, workspace.root(), &config.binary);
        if !binary.is_file() {
            return Err(HarnessError::BinaryNotFound(binary));
        }
    }

    let output = run_checked(runner, &verify_invocation(config, workspace, invocation, platform))?;
    Ok(CapturedOutput::new(Phase::Verify, output.combined()))
}
