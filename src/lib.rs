#![forbid(unsafe_code)]
//! Fixture-driven harness for CMake helper modules.
//!
//! Each fixture is a small CMake project exercising one helper function. The harness stages a fixture into
//! an isolated workspace, optionally installs its Conan packages, configures it with cache-variable
//! overrides, asserts on what the configuration printed, builds it and verifies it by running the binary or
//! CTest, optionally under Valgrind.
//!
//! - [`harness`] - Staging, tool invocation and assertions
//! - [`suite`] - Declarative scenarios and reporting
//! - [`sweep`] - clang-tidy and memcheck sweeps over every fixture
//! - [`cli`] - The `toolbelt` command line
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli`, `harness` and
//!   `suite` modules enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod harness;
pub mod suite;
pub mod sweep;
pub mod version;

pub use harness::{Harness, HarnessConfig, HarnessError, HarnessResult, InvocationConfig, Verification, Workdir};
pub use suite::{Scenario, Suite};
