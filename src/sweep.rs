//! Lint and memory-check sweeps over every registered fixture.
//!
//! A sweep is an ordinary suite with one scenario per fixture, generated from the registry. Sweeps only
//! run on Linux; elsewhere every scenario is reported as skipped.

use toolbelt_core::fixtures::FIXTURES;

use crate::harness::{Harness, HarnessResult};
use crate::suite::{Reporter, Scenario, Suite, SuiteOptions, SuiteSummary, run_suite};

/// Cache variable that turns on clang-tidy in the fixture projects.
pub const CLANG_TIDY_VARIABLE: &str = "run_clang_tidy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Configure with `run_clang_tidy=TRUE`.
    ClangTidy,
    /// Verify under the memory checker.
    Memcheck,
}

impl SweepMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SweepMode::ClangTidy => "clang_tidy",
            SweepMode::Memcheck => "memcheck",
        }
    }
}

/// One scenario per registered fixture, in registry order.
pub fn sweep_suite(mode: SweepMode) -> HarnessResult<Suite> {
    let scenarios = FIXTURES
        .iter()
        .map(|info| {
            let mut scenario = Scenario::new(format!("{}_{}", mode.as_str(), info.canonical), info.canonical);
            scenario.linux_only = true;
            match mode {
                SweepMode::ClangTidy => {
                    scenario.variables.insert(CLANG_TIDY_VARIABLE.to_string(), "TRUE".to_string());
                }
                SweepMode::Memcheck => scenario.memcheck = true,
            }
            scenario
        })
        .collect();
    Suite::new(scenarios)
}

/// Run the sweep, stopping at the first failing fixture.
#[tracing::instrument(skip_all, fields(mode = mode.as_str()))]
pub fn run_sweep(harness: &Harness<'_>, mode: SweepMode, reporter: &mut dyn Reporter) -> HarnessResult<SuiteSummary> {
    let suite = sweep_suite(mode)?;
    let options = SuiteOptions {
        filter: None,
        stop_on_fail: true,
    };
    Ok(run_suite(harness, &suite, &options, reporter))
}
