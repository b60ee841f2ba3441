//! Scenario execution (pytest-style).
//!
//! Every scenario gets a fresh temporary workspace. Staging and package installation are setup: a failure
//! there fails the scenario even when it expects a failure. Only the cycle itself (configure, assertions,
//! build, verify) and the run-output check count towards an expected failure.

use std::time::{Duration, Instant};

use crate::harness::{CycleReport, Harness, HarnessError, HarnessResult, Workdir, expect_failure};

use super::report::Reporter;
use super::{Scenario, Suite};

/// Lines of captured tool output kept in a failure message.
const OUTPUT_TAIL_LINES: usize = 30;

/// Result of running a single scenario.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioResult {
    Passed(Duration),
    Failed(Duration, String),
    Skipped(String),
    /// A scenario marked `expect_failure` whose cycle failed in a tool, as it should.
    ExpectedFailure(Duration),
}

impl ScenarioResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, ScenarioResult::Failed(..))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScenarioResult::Passed(_) => "passed",
            ScenarioResult::Failed(..) => "failed",
            ScenarioResult::Skipped(_) => "skipped",
            ScenarioResult::ExpectedFailure(_) => "expected_failure",
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            ScenarioResult::Passed(d) | ScenarioResult::Failed(d, _) | ScenarioResult::ExpectedFailure(d) => Some(*d),
            ScenarioResult::Skipped(_) => None,
        }
    }
}

/// Totals for a suite run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub expected_failures: usize,
    pub duration: Duration,
}

impl SuiteSummary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, result: &ScenarioResult) {
        match result {
            ScenarioResult::Passed(_) => self.passed += 1,
            ScenarioResult::Failed(..) => self.failed += 1,
            ScenarioResult::Skipped(_) => self.skipped += 1,
            ScenarioResult::ExpectedFailure(_) => self.expected_failures += 1,
        }
    }
}

/// Selection and early-exit settings.
#[derive(Debug, Clone, Default)]
pub struct SuiteOptions {
    /// Only run scenarios whose name contains this keyword.
    pub filter: Option<String>,
    /// Stop after the first failed scenario.
    pub stop_on_fail: bool,
}

/// Run one scenario in a fresh temporary workspace.
pub fn run_scenario(harness: &Harness<'_>, scenario: &Scenario) -> HarnessResult<()> {
    run_scenario_in(harness, scenario, Workdir::Temp).map(drop)
}

/// Run one scenario staged according to `workdir`.
///
/// Returns the cycle report, or `None` for an `expect_failure` scenario whose cycle failed in a tool.
#[tracing::instrument(skip_all, fields(scenario = %scenario.name, fixture = %scenario.fixture))]
pub fn run_scenario_in(
    harness: &Harness<'_>,
    scenario: &Scenario,
    workdir: Workdir,
) -> HarnessResult<Option<CycleReport>> {
    let workspace = harness.stage(&scenario.fixture, workdir)?;
    if scenario.needs_install() {
        harness.install_dependencies(&workspace)?;
    }

    let invocation = scenario.invocation(harness.platform());
    let attempt = harness
        .run_cycle(&workspace, &invocation, &scenario.assertions())
        .and_then(|report| {
            if let Some(expectation) = &scenario.run_output {
                expectation.check(&workspace, &report.verify)?;
            }
            Ok(report)
        });

    if scenario.expect_failure {
        let output = expect_failure(attempt)?;
        tracing::debug!(lines = output.lines().count(), "tool failed as expected");
        Ok(None)
    } else {
        attempt.map(Some)
    }
}

/// Run `scenario` (or skip it) and classify the outcome.
pub fn execute_scenario(harness: &Harness<'_>, scenario: &Scenario) -> ScenarioResult {
    if let Some(reason) = scenario.skip_reason(harness.platform()) {
        return ScenarioResult::Skipped(reason);
    }

    let start = Instant::now();
    let result = run_scenario(harness, scenario);
    let duration = start.elapsed();

    match result {
        Ok(()) if scenario.expect_failure => ScenarioResult::ExpectedFailure(duration),
        Ok(()) => ScenarioResult::Passed(duration),
        Err(err) => ScenarioResult::Failed(duration, failure_message(&err)),
    }
}

/// Run the selected scenarios of `suite` in order, reporting each one.
pub fn run_suite(
    harness: &Harness<'_>,
    suite: &Suite,
    options: &SuiteOptions,
    reporter: &mut dyn Reporter,
) -> SuiteSummary {
    let start = Instant::now();
    let selected: Vec<&Scenario> = suite.filtered(options.filter.as_deref()).collect();
    reporter.on_collection_complete(selected.len());

    let mut summary = SuiteSummary::default();
    for scenario in selected {
        reporter.on_scenario_start(scenario);
        let result = execute_scenario(harness, scenario);
        reporter.on_scenario_complete(scenario, &result);

        summary.total += 1;
        summary.record(&result);

        if options.stop_on_fail && result.is_failure() {
            tracing::info!(scenario = %scenario.name, "stopping after first failure");
            break;
        }
    }

    summary.duration = start.elapsed();
    reporter.on_run_complete(&summary);
    summary
}

/// Error text plus the tail of the failing tool's output, if any.
fn failure_message(err: &HarnessError) -> String {
    let mut message = err.to_string();
    if let Some(output) = err.tool_output() {
        let lines: Vec<&str> = output.lines().collect();
        let tail = &lines[lines.len().saturating_sub(OUTPUT_TAIL_LINES)..];
        if !tail.is_empty() {
            message.push('\n');
            message.push_str(&tail.join("\n"));
        }
    }
    message
}
