//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use toolbelt_core::fixtures::FIXTURES;

use crate::harness::{Harness, HarnessConfig, Workdir};
use crate::suite::{ConsoleReporter, JsonReporter, Scenario, Suite, SuiteOptions, SuiteSummary, run_scenario_in, run_suite};
use crate::sweep::{SweepMode, run_sweep};

use super::{CliError, CliResult, ExitCode};

// ============================================================================
// Configuration
// ============================================================================

/// Load the harness configuration for this invocation.
///
/// An explicit `--config` file must exist; otherwise `toolbelt.toml` in the current directory is used when
/// present. `--templates` is resolved against the current directory and wins over the file.
pub fn load_config(config: Option<&Path>, templates: Option<&Path>) -> CliResult<HarnessConfig> {
    let cwd = env::current_dir()
        .map_err(|e| CliError::harness_error(format!("Error: cannot determine the current directory: {}", e)))?;

    let mut harness_config = match config {
        Some(path) => HarnessConfig::from_file(path)?,
        None => HarnessConfig::discover(&cwd)?,
    };
    if let Some(dir) = templates {
        harness_config = harness_config.with_template_root(cwd.join(dir));
    }

    tracing::debug!(
        templates = %harness_config.template_root().display(),
        shared = harness_config.shared.len(),
        "configuration loaded"
    );
    Ok(harness_config)
}

// ============================================================================
// run
// ============================================================================

/// Arguments of the `run` subcommand.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub fixture: String,
    pub preset: Option<String>,
    pub build_preset: Option<String>,
    pub defines: Vec<(String, String)>,
    pub ctest: bool,
    pub memcheck: bool,
    pub contains: Vec<String>,
    pub not_contains: Vec<String>,
    pub expect_failure: bool,
    pub workdir: Option<PathBuf>,
}

impl RunRequest {
    /// Ad-hoc scenario for this request. `--ctest` forces the test tool; without it the registry decides.
    pub fn scenario(&self) -> Scenario {
        let mut scenario = Scenario::new(self.fixture.clone(), self.fixture.clone());
        scenario.preset = self.preset.clone();
        scenario.build_preset = self.build_preset.clone();
        scenario.variables = self.defines.iter().cloned().collect();
        scenario.contains = self.contains.clone();
        scenario.not_contains = self.not_contains.clone();
        scenario.expect_failure = self.expect_failure;
        scenario.ctest = self.ctest.then_some(true);
        scenario.memcheck = self.memcheck;
        scenario
    }
}

/// Run one cycle and print what the project printed.
pub fn run_fixture(config: HarnessConfig, request: RunRequest) -> CliResult<ExitCode> {
    let harness = Harness::new(config);
    let scenario = request.scenario();
    let workdir = request.workdir.clone().map_or(Workdir::Temp, Workdir::At);

    match run_scenario_in(&harness, &scenario, workdir) {
        Ok(Some(report)) => {
            print!("{}", report.configure.text());
            print!("{}", report.verify.text());
            eprintln!("\x1b[32m{} passed\x1b[0m", request.fixture);
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => {
            eprintln!("\x1b[32m{} failed as expected\x1b[0m", request.fixture);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if let Some(output) = err.tool_output() {
                eprintln!("{}", output);
            }
            Err(err.into())
        }
    }
}

// ============================================================================
// suite / sweep
// ============================================================================

/// Run a manifest (or the built-in suite) and report to the console or as JSON lines.
pub fn run_suite_command(
    config: HarnessConfig,
    manifest: Option<&Path>,
    filter: Option<String>,
    stop_on_fail: bool,
    verbose: bool,
    json: bool,
) -> CliResult<ExitCode> {
    let suite = match manifest {
        Some(path) => Suite::from_file(path)?,
        None => Suite::builtin()?,
    };
    let harness = Harness::new(config);
    let options = SuiteOptions { filter, stop_on_fail };

    let summary = if json {
        let mut reporter = JsonReporter::new(io::stdout().lock());
        let summary = run_suite(&harness, &suite, &options, &mut reporter);
        reporter
            .finish()
            .map_err(|e| CliError::harness_error(format!("Error writing report: {}", e)))?;
        summary
    } else {
        run_suite(&harness, &suite, &options, &mut ConsoleReporter::new(verbose))
    };

    Ok(exit_code_for(&summary))
}

pub fn run_sweep_command(config: HarnessConfig, mode: SweepMode) -> CliResult<ExitCode> {
    let harness = Harness::new(config);
    let summary = run_sweep(&harness, mode, &mut ConsoleReporter::new(true))?;
    Ok(exit_code_for(&summary))
}

fn exit_code_for(summary: &SuiteSummary) -> ExitCode {
    if summary.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ============================================================================
// fixtures
// ============================================================================

/// Print the fixture registry.
pub fn list_fixtures() -> CliResult<ExitCode> {
    let width = FIXTURES.iter().map(|f| f.canonical.len()).max().unwrap_or(0);
    for info in FIXTURES {
        let mut tags = Vec::new();
        if info.needs_install {
            tags.push("conan");
        }
        if info.runs_test_tool {
            tags.push("ctest");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        println!("{:<width$}  {}{}", info.canonical, info.summary, tags, width = width);
    }
    Ok(ExitCode::SUCCESS)
}
