//! One configure → assert → build → verify cycle.

use toolbelt_core::Platform;

use super::assertions::{AssertionSet, CapturedOutput};
use super::config::HarnessConfig;
use super::configure::{build, configure};
use super::execute::verify;
use super::install::install_dependencies;
use super::invocation::InvocationConfig;
use super::process::{SystemRunner, ToolRunner};
use super::stage::{Workdir, Workspace, stage};
use super::HarnessResult;

/// Output of a completed cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Everything the configuration step printed (already checked against the assertion set).
    pub configure: CapturedOutput,
    /// What the binary or the test tool printed.
    pub verify: CapturedOutput,
}

/// Entry point bundling the configuration, the process runner and the target platform.
///
/// ```no_run
/// use toolbelt::harness::{AssertionSet, Harness, HarnessConfig, InvocationConfig, Workdir};
///
/// let harness = Harness::new(HarnessConfig::default());
/// let workspace = harness.stage("enum", Workdir::Temp)?;
/// harness.run_cycle(&workspace, &InvocationConfig::builder().build(), &AssertionSet::new())?;
/// # Ok::<(), toolbelt::harness::HarnessError>(())
/// ```
pub struct Harness<'r> {
    config: HarnessConfig,
    runner: &'r dyn ToolRunner,
    platform: Platform,
}

static SYSTEM_RUNNER: SystemRunner = SystemRunner;

impl Harness<'static> {
    /// Harness that spawns real processes on the current platform.
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_runner(config, &SYSTEM_RUNNER)
    }
}

impl<'r> Harness<'r> {
    pub fn with_runner(config: HarnessConfig, runner: &'r dyn ToolRunner) -> Self {
        Self {
            config,
            runner,
            platform: Platform::current(),
        }
    }

    /// Pretend to run on `platform` (affects binary resolution and Conan presets).
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn runner(&self) -> &'r dyn ToolRunner {
        self.runner
    }

    /// Stage a fixture. See [`stage`].
    pub fn stage(&self, fixture: &str, workdir: Workdir) -> HarnessResult<Workspace> {
        stage(&self.config, fixture, workdir)
    }

    /// Install the workspace's packages. See [`install_dependencies`].
    pub fn install_dependencies<'w>(&self, workspace: &'w Workspace) -> HarnessResult<&'w Workspace> {
        install_dependencies(self.runner, &self.config, workspace)
    }

    pub fn configure(&self, workspace: &Workspace, invocation: &InvocationConfig) -> HarnessResult<CapturedOutput> {
        configure(self.runner, &self.config, workspace, invocation)
    }

    pub fn build(&self, workspace: &Workspace, invocation: &InvocationConfig) -> HarnessResult<()> {
        build(self.runner, &self.config, workspace, invocation)
    }

    pub fn verify(&self, workspace: &Workspace, invocation: &InvocationConfig) -> HarnessResult<CapturedOutput> {
        verify(self.runner, &self.config, workspace, invocation, self.platform)
    }

    /// Configure, check `assertions` against the configure output, build, then verify.
    ///
    /// The first failing phase aborts the cycle; later phases do not run.
    #[tracing::instrument(skip_all, fields(fixture = workspace.fixture()))]
    pub fn run_cycle(
        &self,
        workspace: &Workspace,
        invocation: &InvocationConfig,
        assertions: &AssertionSet,
    ) -> HarnessResult<CycleReport> {
        let configure_output = self.configure(workspace, invocation)?;
        assertions.check(&configure_output)?;

        self.build(workspace, invocation)?;
        let verify_output = self.verify(workspace, invocation)?;

        Ok(CycleReport {
            configure: configure_output,
            verify: verify_output,
        })
    }
}
