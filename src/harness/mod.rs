//! Fixture-driven build harness.
//!
//! A cycle stages a fixture project, optionally installs its packages, configures it, asserts on the
//! configuration output, builds it and finally verifies it:
//!
//! ```text
//! stage ─▶ [install] ─▶ configure ─▶ assert ─▶ build ─▶ verify
//! ```
//!
//! ## Modules
//!
//! - `stage` - Copy templates into an isolated [`Workspace`]
//! - `install` - Conan profile detection and package install
//! - `configure` - Configure and build command lines
//! - `execute` - Binary resolution and the verify phase
//! - `assertions` - Substring and line checks over captured output
//! - `cycle` - The [`Harness`] facade tying the phases together
//! - `process` - The [`ToolRunner`] seam every process goes through
//!
//! ## Design
//!
//! Phases take the workspace explicitly; nothing changes the process's working directory or environment.
//! Every tool call blocks, and a non-zero exit aborts the remaining phases as
//! [`HarnessError::ToolFailed`].

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod assertions;
pub mod config;
pub mod configure;
pub mod cycle;
pub mod error;
pub mod execute;
pub mod install;
pub mod invocation;
pub mod process;
pub mod recording;
pub mod stage;

pub use assertions::{AssertionSet, CapturedOutput, Phase, RunOutputExpectation, Segment, expect_failure};
pub use config::HarnessConfig;
pub use cycle::{CycleReport, Harness};
pub use error::{AssertionFailure, HarnessError, HarnessResult};
pub use execute::resolve_binary;
pub use invocation::{InvocationBuilder, InvocationConfig, Verification};
pub use process::{SystemRunner, ToolInvocation, ToolOutput, ToolRunner};
pub use recording::RecordingRunner;
pub use stage::{Workdir, Workspace};
