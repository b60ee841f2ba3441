//! End-to-end cycle tests against the recording runner.
//!
//! No CMake, Conan or Valgrind is needed: the runner records every command line and answers with scripted
//! output, so these tests pin down phase ordering, argument assembly and failure propagation.

mod common;

use common::{EMBED_ONE, EMBED_TWO, HELPER_MODULE, Templates, harness};
use toolbelt::harness::{
    AssertionFailure, AssertionSet, HarnessError, InvocationConfig, RecordingRunner, ToolOutput, Verification,
    Workdir, expect_failure,
};
use toolbelt::suite::{Scenario, Suite, run_scenario};
use toolbelt_core::Platform;
use toolbelt_core::memcheck::{MEMCHECK_OPTIONS, ctest_memcheck_args};
use toolbelt_core::messages;
use toolbelt_core::tools::{CONAN_HOME_ENV, DEFAULT_BINARY_NAME, ToolId};

fn zlib_found() -> String {
    format!(
        "{}{}\n",
        messages::STATUS_MARKER,
        messages::message(messages::CURRENT, "add_dep", "found ZLIB with components")
    )
}

// ============================================================================
// Configuration arguments
// ============================================================================

#[test]
fn empty_overrides_produce_no_define_flags() {
    let templates = Templates::new();
    let runner = RecordingRunner::new();
    let harness = harness(&templates, &runner);

    let ws = harness.stage("enum", Workdir::Temp).unwrap();
    harness.configure(&ws, &InvocationConfig::builder().build()).unwrap();

    let calls = runner.calls_to(ToolId::Cmake);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec!["."]);
    assert_eq!(calls[0].cwd, ws.root());
    assert!(ws.root().join(HELPER_MODULE).is_file());
}

#[test]
fn overrides_follow_insertion_order() {
    let templates = Templates::new();
    let runner = RecordingRunner::new();
    let harness = harness(&templates, &runner);

    let ws = harness.stage("check_includes", Workdir::Temp).unwrap();
    let invocation = InvocationConfig::builder()
        .preset("dev")
        .variable("language", "CXX")
        .variable("include", "stdlib.h")
        .variable("run_twice", "TRUE")
        .build();
    harness.configure(&ws, &invocation).unwrap();

    assert_eq!(
        runner.calls_to(ToolId::Cmake)[0].args,
        vec![".", "--preset", "dev", "-Dlanguage=CXX", "-Dinclude=stdlib.h", "-Drun_twice=TRUE"]
    );
}

// ============================================================================
// Installer
// ============================================================================

#[test]
fn installer_runs_profile_detect_then_install_with_isolated_cache() {
    let templates = Templates::new();
    let runner = RecordingRunner::new();
    let harness = harness(&templates, &runner);

    let ws = harness.stage("add_dep", Workdir::Temp).unwrap();
    harness.install_dependencies(&ws).unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].args, vec!["profile", "detect", "--force"]);
    assert_eq!(calls[1].args, vec!["install", ".", "--build=missing"]);
    for call in &calls {
        assert_eq!(call.tool, ToolId::Conan);
        assert_eq!(call.cwd, ws.root());
        assert_eq!(call.env, vec![(CONAN_HOME_ENV.to_string(), ws.cache_home().as_os_str().to_owned())]);
    }
    assert!(ws.cache_home().is_dir());
    assert!(!ws.cache_home().starts_with(ws.root()));
}

#[test]
fn installer_failure_aborts_before_configure() {
    let templates = Templates::new();
    let runner = RecordingRunner::new().respond_to_arg("--build=missing", ToolOutput::failed(1, "ERROR: zlib"));
    let harness = harness(&templates, &runner);

    let err = run_scenario(&harness, &Scenario::new("add_dep", "add_dep")).unwrap_err();
    assert!(matches!(err, HarnessError::ToolFailed { tool: ToolId::Conan, .. }));
    assert!(runner.calls_to(ToolId::Cmake).is_empty());
}

// ============================================================================
// Assertions and expected failures
// ============================================================================

#[test]
fn dependency_message_is_asserted_after_configure() {
    let templates = Templates::new();
    let runner = RecordingRunner::new().respond(ToolId::Cmake, ToolOutput::ok(zlib_found()));
    let harness = harness(&templates, &runner);

    let mut scenario = Scenario::new("add_dep", "add_dep");
    scenario.contains.push("found ZLIB with components".to_string());
    scenario.not_contains.push(messages::detail(messages::CURRENT, "add_dep", "visibility ="));
    run_scenario(&harness, &scenario).unwrap();

    let lines = runner.command_lines();
    assert_eq!(lines.len(), 5);
    assert!(lines[2].starts_with("cmake . --preset conan-release"));
    assert!(lines[3].starts_with("cmake --build . --preset conan-release"));
    assert!(lines[4].ends_with(DEFAULT_BINARY_NAME));
}

#[test]
fn missing_message_fails_before_build() {
    let templates = Templates::new();
    let runner = RecordingRunner::new().respond(ToolId::Cmake, ToolOutput::ok("-- nothing found\n"));
    let harness = harness(&templates, &runner);

    let ws = harness.stage("add_dep", Workdir::Temp).unwrap();
    let err = harness
        .run_cycle(
            &ws,
            &InvocationConfig::builder().build(),
            &AssertionSet::new().contains("found ZLIB with components"),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        HarnessError::Assertion(AssertionFailure::Missing(ref needle)) if needle == "found ZLIB with components"
    ));
    assert_eq!(runner.calls().len(), 1, "build and verify must not run");
}

#[test]
fn broken_dependency_arguments_fail_as_expected() {
    let broken = ToolOutput {
        success: false,
        code: Some(1),
        stdout: "-- Conan toolchain: Including user_toolchain\n".to_string(),
        stderr: "CMake Error at add_dep.cmake:12 (find_package):\n  find_package called with invalid argument \"invalid_arg\"\n"
            .to_string(),
    };
    let runner = RecordingRunner::new()
        .respond(ToolId::Cmake, ToolOutput::ok(zlib_found()))
        .respond_to_arg("-Dfind_package_args=invalid_arg", broken);
    let templates = Templates::new();
    let harness = harness(&templates, &runner);
    let suite = Suite::builtin().unwrap();

    let found = messages::message(messages::CURRENT, "add_dep", "found ZLIB with components");

    // A working configure prints the message.
    let ws = harness.stage("add_dep", Workdir::Temp).unwrap();
    harness.install_dependencies(&ws).unwrap();
    let healthy = harness
        .configure(&ws, &suite.get("add_dep").unwrap().invocation(Platform::Linux))
        .unwrap();
    assert!(healthy.contains(&found));

    // A broken find_package argument fails the configure before the message is printed.
    let invalid = suite.get("add_dep_extra_args_invalid").unwrap();
    let ws = harness.stage("add_dep", Workdir::Temp).unwrap();
    let result = harness.configure(&ws, &invalid.invocation(Platform::Linux));
    let output = expect_failure(result).unwrap();
    assert!(output.contains("invalid argument"));
    assert!(!output.contains(&found));

    // Through the suite runner: conan x2, then the failing configure; nothing after it.
    let calls_before = runner.calls().len();
    run_scenario(&harness, invalid).unwrap();
    assert_eq!(runner.calls().len() - calls_before, 3);
}

#[test]
fn enum_error_fails_as_expected() {
    let templates = Templates::new();
    let runner = RecordingRunner::new().respond_to_arg("-Derror=TRUE", ToolOutput::failed(1, "CMake Error"));
    let harness = harness(&templates, &runner);

    let suite = Suite::builtin().unwrap();
    run_scenario(&harness, suite.get("enum_any_error").unwrap()).unwrap();
    run_scenario(&harness, suite.get("enum_any").unwrap()).unwrap();
}

#[test]
fn expected_failure_that_succeeds_is_an_error() {
    let templates = Templates::new();
    let runner = RecordingRunner::new();
    let harness = harness(&templates, &runner);

    let mut scenario = Scenario::new("required_error", "required");
    scenario.variables.insert("error".to_string(), "TRUE".to_string());
    scenario.expect_failure = true;

    let err = run_scenario(&harness, &scenario).unwrap_err();
    assert!(matches!(err, HarnessError::UnexpectedSuccess));
}

#[test]
fn unknown_fixture_is_not_an_expected_failure() {
    let templates = Templates::new();
    let runner = RecordingRunner::new();
    let harness = harness(&templates, &runner);

    let mut scenario = Scenario::new("typo", "does_not_exist");
    scenario.expect_failure = true;

    let err = run_scenario(&harness, &scenario).unwrap_err();
    assert!(matches!(err, HarnessError::UnknownFixture { .. }));
    assert!(runner.calls().is_empty());
}

// ============================================================================
// Verification
// ============================================================================

#[test]
fn embed_output_matches_repeated_files() {
    let templates = Templates::new();
    let printed = format!("{}\n{}", EMBED_ONE.repeat(7), format!("{EMBED_ONE}{EMBED_TWO}\n").repeat(4));
    let runner = RecordingRunner::new().respond(ToolId::Binary, ToolOutput::ok(printed));
    let harness = harness(&templates, &runner);

    let suite = Suite::builtin().unwrap();
    let mut scenario = suite.get("embed").unwrap().clone();
    scenario.contains.clear();
    run_scenario(&harness, &scenario).unwrap();
}

#[test]
fn embed_output_with_wrong_repetition_fails() {
    let templates = Templates::new();
    let printed = format!("{}{}", EMBED_ONE.repeat(6), format!("{EMBED_ONE}{EMBED_TWO}").repeat(4));
    let runner = RecordingRunner::new().respond(ToolId::Binary, ToolOutput::ok(printed));
    let harness = harness(&templates, &runner);

    let suite = Suite::builtin().unwrap();
    let mut scenario = suite.get("embed").unwrap().clone();
    scenario.contains.clear();

    let err = run_scenario(&harness, &scenario).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Assertion(AssertionFailure::LinesMismatch { .. })
    ));
}

#[test]
fn direct_run_without_binary_is_a_resolution_failure() {
    let templates = Templates::new();
    let runner = RecordingRunner::new();
    let harness = harness(&templates, &runner);

    let ws = harness.stage("no_binary", Workdir::Temp).unwrap();
    let err = harness
        .run_cycle(&ws, &InvocationConfig::builder().build(), &AssertionSet::new())
        .unwrap_err();

    assert!(matches!(err, HarnessError::BinaryNotFound(ref path) if path == &ws.root().join(DEFAULT_BINARY_NAME)));
    assert_eq!(runner.calls().len(), 2, "configure and build only");
}

#[test]
fn memcheck_wraps_binary_in_valgrind() {
    let templates = Templates::new();
    let runner = RecordingRunner::new();
    let harness = harness(&templates, &runner);

    let ws = harness.stage("enum", Workdir::Temp).unwrap();
    let invocation = InvocationConfig::builder()
        .verification(Verification::DirectRunWithMemcheck)
        .build();
    harness.verify(&ws, &invocation).unwrap();

    let calls = runner.calls_to(ToolId::Valgrind);
    assert_eq!(calls.len(), 1);
    let mut expected: Vec<String> = MEMCHECK_OPTIONS.iter().map(|s| s.to_string()).collect();
    expected.push(ws.root().join(DEFAULT_BINARY_NAME).display().to_string());
    assert_eq!(calls[0].args, expected);
}

#[test]
fn test_tool_modes() {
    let templates = Templates::new();
    let runner = RecordingRunner::new();
    let harness = harness(&templates, &runner);

    // no binary needed when the test tool verifies
    let ws = harness.stage("no_binary", Workdir::Temp).unwrap();
    harness
        .verify(&ws, &InvocationConfig::builder().flags(true, false).build())
        .unwrap();
    harness
        .verify(&ws, &InvocationConfig::builder().flags(true, true).build())
        .unwrap();

    let calls = runner.calls_to(ToolId::Ctest);
    assert_eq!(calls.len(), 2);
    assert!(calls[0].args.is_empty());
    assert_eq!(calls[1].args, ctest_memcheck_args());
}

#[test]
fn verify_output_is_captured() {
    let templates = Templates::new();
    let runner = RecordingRunner::new().respond(ToolId::Ctest, ToolOutput::ok("100% tests passed\n"));
    let harness = harness(&templates, &runner);

    let ws = harness.stage("setup_gtest", Workdir::Temp).unwrap();
    let report = harness
        .run_cycle(&ws, &InvocationConfig::builder().flags(true, false).build(), &AssertionSet::new())
        .unwrap();
    assert!(report.verify.contains("100% tests passed"));
    assert!(report.configure.text().is_empty());
}
