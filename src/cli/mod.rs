//! CLI module for the toolbelt harness
//!
//! ## Commands
//!
//! - `run <fixture>` - Run one configure/build/verify cycle
//! - `suite [manifest]` - Run a scenario manifest (the built-in suite by default)
//! - `sweep --clang-tidy | --memcheck` - Lint or memory-check every fixture
//! - `fixtures` - List the registered fixtures
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Parser, Subcommand};

use crate::harness::HarnessError;
use crate::version::TOOLBELT_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
///
/// Follows pytest's split: `1` means the harness ran and a scenario failed, `2` means the harness could
/// not run at all (bad configuration or manifest, unknown fixture, a tool that cannot be started).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// A scenario failed: a tool exited non-zero, an assertion did not hold, or an expected failure
    /// succeeded.
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The harness itself could not run.
    pub const HARNESS_ERROR: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// A scenario failed (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// The harness could not run (exit code 2).
    pub fn harness_error(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::HARNESS_ERROR)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Harness errors are rendered as miette diagnostics (code, help, source chain). Fixture misbehaviour
/// exits with [`ExitCode::FAILURE`], everything else with [`ExitCode::HARNESS_ERROR`].
impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        let exit_code = if err.is_scenario_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::HARNESS_ERROR
        };
        CliError::new(format!("{:?}", miette::Report::new(err)), exit_code)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Fixture-driven harness for CMake helper modules
#[derive(Parser, Debug)]
#[command(name = "toolbelt")]
#[command(version = TOOLBELT_VERSION)]
#[command(about = "Fixture-driven harness for CMake helper modules", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Harness configuration (default: ./toolbelt.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the fixture templates (overrides the configuration)
    #[arg(long, global = true, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one configure/build/verify cycle on a fixture
    Run {
        /// Fixture template name
        #[arg(value_name = "FIXTURE")]
        fixture: String,
        /// Configure preset
        #[arg(short, long, value_name = "PRESET")]
        preset: Option<String>,
        /// Build preset
        #[arg(short, long, value_name = "PRESET")]
        build_preset: Option<String>,
        /// Cache variable override, repeatable and applied in order
        #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_define)]
        defines: Vec<(String, String)>,
        /// Verify with ctest instead of running the binary
        #[arg(long)]
        ctest: bool,
        /// Verify under valgrind
        #[arg(long)]
        memcheck: bool,
        /// Substring the configure output must contain
        #[arg(long, value_name = "TEXT")]
        contains: Vec<String>,
        /// Substring the configure output must not contain
        #[arg(long = "not-contains", value_name = "TEXT")]
        not_contains: Vec<String>,
        /// Succeed only if a tool fails
        #[arg(long)]
        expect_failure: bool,
        /// Stage into this directory and keep it (default: a temporary directory)
        #[arg(long, value_name = "DIR")]
        workdir: Option<PathBuf>,
    },

    /// Run a scenario manifest (pytest-style)
    Suite {
        /// Scenario manifest (default: the built-in suite)
        #[arg(value_name = "MANIFEST")]
        manifest: Option<PathBuf>,
        /// Only run scenarios whose name contains EXPR
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Stop on first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Report as JSON lines on stdout
        #[arg(long, conflicts_with = "verbose")]
        json: bool,
    },

    /// Run clang-tidy or valgrind over every fixture (Linux only)
    #[command(group(ArgGroup::new("mode").required(true).args(["clang_tidy", "memcheck"])))]
    Sweep {
        /// Configure every fixture with run_clang_tidy=TRUE
        #[arg(long)]
        clang_tidy: bool,
        /// Verify every fixture under the memory checker
        #[arg(long)]
        memcheck: bool,
    },

    /// List the registered fixtures
    Fixtures,
}

/// Parse `KEY=VALUE`; the value may be empty or contain further `=`.
fn parse_define(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("missing variable name in '{raw}'")),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    if let Command::Fixtures = cli.command {
        return commands::list_fixtures();
    }

    let config = commands::load_config(cli.config.as_deref(), cli.templates.as_deref())?;

    match cli.command {
        Command::Run {
            fixture,
            preset,
            build_preset,
            defines,
            ctest,
            memcheck,
            contains,
            not_contains,
            expect_failure,
            workdir,
        } => commands::run_fixture(
            config,
            commands::RunRequest {
                fixture,
                preset,
                build_preset,
                defines,
                ctest,
                memcheck,
                contains,
                not_contains,
                expect_failure,
                workdir,
            },
        ),
        Command::Suite {
            manifest,
            filter,
            stop_on_fail,
            verbose,
            json,
        } => commands::run_suite_command(config, manifest.as_deref(), filter, stop_on_fail, verbose, json),
        Command::Sweep { clang_tidy, memcheck } => {
            let mode = match (clang_tidy, memcheck) {
                (true, _) => crate::sweep::SweepMode::ClangTidy,
                (false, true) => crate::sweep::SweepMode::Memcheck,
                (false, false) => return Err(CliError::harness_error("sweep requires --clang-tidy or --memcheck")),
            };
            commands::run_sweep_command(config, mode)
        }
        Command::Fixtures => commands::list_fixtures(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::harness::AssertionFailure;
    use toolbelt_core::tools::ToolId;

    #[test]
    fn test_scenario_failures_exit_with_failure() {
        let tool = CliError::from(HarnessError::ToolFailed {
            tool: ToolId::Cmake,
            command: "cmake . -Derror=TRUE".to_string(),
            code: Some(1),
            output: "CMake Error".to_string(),
        });
        assert_eq!(tool.exit_code, ExitCode::FAILURE);
        assert!(tool.message.contains("cmake . -Derror=TRUE"));

        let missing = CliError::from(HarnessError::Assertion(AssertionFailure::Missing("found".to_string())));
        assert_eq!(missing.exit_code, ExitCode::FAILURE);
        assert_eq!(CliError::from(HarnessError::UnexpectedSuccess).exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_harness_errors_exit_with_harness_error() {
        let unknown = CliError::from(HarnessError::UnknownFixture {
            name: "typo".to_string(),
            path: PathBuf::from("tests/test_data/typo"),
        });
        assert_eq!(unknown.exit_code, ExitCode::HARNESS_ERROR);
        assert!(unknown.message.contains("typo"));

        let shared = CliError::from(HarnessError::MissingSharedDir(PathBuf::from("src")));
        assert_eq!(shared.exit_code, ExitCode::HARNESS_ERROR);
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::try_parse_from([
            "toolbelt",
            "run",
            "add_dep",
            "-p",
            "conan-release",
            "-D",
            "version=1.3",
            "-Dvisibility=PRIVATE",
            "--contains",
            "found ZLIB with components",
        ])
        .unwrap();
        if let Command::Run {
            fixture,
            preset,
            defines,
            contains,
            ctest,
            ..
        } = cli.command
        {
            assert_eq!(fixture, "add_dep");
            assert_eq!(preset.as_deref(), Some("conan-release"));
            assert_eq!(
                defines,
                vec![
                    ("version".to_string(), "1.3".to_string()),
                    ("visibility".to_string(), "PRIVATE".to_string()),
                ]
            );
            assert_eq!(contains, vec!["found ZLIB with components"]);
            assert!(!ctest);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_define_errors() {
        assert!(Cli::try_parse_from(["toolbelt", "run", "enum", "-D", "novalue"]).is_err());
        assert!(Cli::try_parse_from(["toolbelt", "run", "enum", "-D", "=x"]).is_err());
        assert_eq!(parse_define("args=a=b").unwrap(), ("args".to_string(), "a=b".to_string()));
        assert_eq!(parse_define("empty=").unwrap(), ("empty".to_string(), String::new()));
    }

    #[test]
    fn test_cli_parse_suite() {
        let cli = Cli::try_parse_from(["toolbelt", "suite", "-v", "-x", "-k", "add_dep"]).unwrap();
        if let Command::Suite {
            manifest,
            verbose,
            stop_on_fail,
            filter,
            json,
        } = cli.command
        {
            assert!(manifest.is_none());
            assert!(verbose);
            assert!(stop_on_fail);
            assert!(!json);
            assert_eq!(filter.as_deref(), Some("add_dep"));
        } else {
            panic!("Expected Suite command");
        }
    }

    #[test]
    fn test_cli_parse_sweep_requires_one_mode() {
        assert!(Cli::try_parse_from(["toolbelt", "sweep"]).is_err());
        assert!(Cli::try_parse_from(["toolbelt", "sweep", "--clang-tidy", "--memcheck"]).is_err());

        let cli = Cli::try_parse_from(["toolbelt", "sweep", "--memcheck"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Sweep {
                clang_tidy: false,
                memcheck: true
            }
        ));
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::try_parse_from(["toolbelt", "fixtures", "--config", "ci/toolbelt.toml", "--templates", "t"])
            .unwrap();
        assert!(matches!(cli.command, Command::Fixtures));
        assert_eq!(cli.config, Some(PathBuf::from("ci/toolbelt.toml")));
        assert_eq!(cli.templates, Some(PathBuf::from("t")));
    }

    #[test]
    fn test_harness_error_becomes_failure() {
        let err: CliError = HarnessError::UnexpectedSuccess.into();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("expected a tool failure"));
    }
}
