//! Memory-check options shared by the test-runner and direct-run paths.
//!
//! Leaks of any kind are reported and turned into a non-zero exit so a leak fails the phase the same way a
//! crash does.

/// Options handed to the memory-checking wrapper.
pub const MEMCHECK_OPTIONS: &[&str] = &[
    "--leak-check=full",
    "--show-leak-kinds=all",
    "--errors-for-leak-kinds=all",
    "--error-exitcode=1",
];

/// Flags that make the test runner wrap each test in the memory checker.
///
/// The `MemoryCheckCommandOptions=` value is appended separately, see [`ctest_memcheck_args`].
pub const CTEST_OUTPUT_ON_FAILURE: &str = "--output-on-failure";
pub const CTEST_OVERWRITE: &str = "--overwrite";
pub const CTEST_MEMCHECK_OPTIONS_KEY: &str = "MemoryCheckCommandOptions";
pub const CTEST_TEST_ACTION: &str = "-T";
pub const CTEST_MEMCHECK_ACTION: &str = "memcheck";

/// The options joined into a single argument.
pub fn joined_options() -> String {
    MEMCHECK_OPTIONS.join(" ")
}

/// Full argument list for a memcheck run through the test runner.
pub fn ctest_memcheck_args() -> Vec<String> {
    vec![
        CTEST_OUTPUT_ON_FAILURE.to_string(),
        CTEST_OVERWRITE.to_string(),
        format!("{}={}", CTEST_MEMCHECK_OPTIONS_KEY, joined_options()),
        CTEST_TEST_ACTION.to_string(),
        CTEST_MEMCHECK_ACTION.to_string(),
    ]
}
